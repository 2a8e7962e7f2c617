use thiserror::Error;

/// Errors surfaced to callers of the router.
///
/// Malformed classifier output is not represented here: it is recovered by
/// the classifier's fallback policy and never returned as an error.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("provider request failed with status {status}: {body}")]
    ProviderRequestFailed { status: u16, body: String },

    #[error("provider unreachable: {0}")]
    ProviderUnreachable(String),

    #[error("unsupported intent: {0:?} (expected one of company, person, job)")]
    UnsupportedIntent(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

impl RouterError {
    pub fn unreachable(err: impl std::fmt::Display) -> Self {
        Self::ProviderUnreachable(err.to_string())
    }

    pub fn invalid_parameters(err: impl std::fmt::Display) -> Self {
        Self::InvalidParameters(err.to_string())
    }

    /// Stable machine-readable code used in error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProviderRequestFailed { .. } => "provider_request_failed",
            Self::ProviderUnreachable(_) => "provider_unreachable",
            Self::UnsupportedIntent(_) => "unsupported_intent",
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidParameters(_) => "invalid_parameters",
            Self::InvalidResponse(_) => "invalid_response",
            Self::ClassifierUnavailable(_) => "classifier_unavailable",
        }
    }

    /// True when the caller sent something the router cannot act on.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedIntent(_) | Self::UnknownTool(_) | Self::InvalidParameters(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(RouterError::UnsupportedIntent("school".into()).is_client_error());
        assert!(RouterError::UnknownTool("x".into()).is_client_error());
        assert!(
            !RouterError::ProviderRequestFailed {
                status: 500,
                body: String::new()
            }
            .is_client_error()
        );
    }

    #[test]
    fn provider_failure_message_carries_status_and_body() {
        let err = RouterError::ProviderRequestFailed {
            status: 403,
            body: r#"{"description":"bad key"}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("bad key"));
        assert_eq!(err.code(), "provider_request_failed");
    }

    #[test]
    fn classifier_outage_is_not_a_client_error() {
        let err = RouterError::ClassifierUnavailable("connection refused".into());
        assert_eq!(err.code(), "classifier_unavailable");
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("connection refused"));
    }
}
