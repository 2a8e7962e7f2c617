//! Outbound calls: the provider's search endpoints, or the gateway in front
//! of them. Both return the response body untouched.

pub mod client;
pub mod gateway;

pub use client::ProviderClient;
pub use gateway::GatewayClient;

use async_trait::async_trait;
use prospect_core::error::RouterError;
use prospect_core::types::SearchRequest;
use serde_json::Value;

/// Raw response body of a successful search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ProviderBody {
    pub fn json(&self) -> Result<Value, RouterError> {
        serde_json::from_slice(&self.bytes)
            .map_err(|e| RouterError::InvalidResponse(format!("body is not JSON: {}", e)))
    }
}

/// Anything able to execute a search request.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<ProviderBody, RouterError>;
}

/// Turn a reqwest response into a body or `ProviderRequestFailed`.
pub(crate) async fn read_response(
    response: reqwest::Response,
) -> Result<ProviderBody, RouterError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await.map_err(RouterError::unreachable)?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes).into_owned();
        tracing::warn!(status = status.as_u16(), body = %body, "search request failed");
        return Err(RouterError::ProviderRequestFailed {
            status: status.as_u16(),
            body,
        });
    }

    Ok(ProviderBody {
        bytes: bytes.to_vec(),
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_json_parses_and_rejects() {
        let ok = ProviderBody {
            bytes: br#"{"results":[]}"#.to_vec(),
            content_type: Some("application/json".into()),
        };
        assert_eq!(ok.json().unwrap(), serde_json::json!({"results": []}));

        let bad = ProviderBody {
            bytes: b"<html>".to_vec(),
            content_type: None,
        };
        assert!(matches!(bad.json(), Err(RouterError::InvalidResponse(_))));
    }
}
