//! Query classification: free text to an intent plus parameters.

pub mod ollama;
pub mod parse;
pub mod prompt;
pub mod rules;

pub use ollama::OllamaModel;
pub use parse::parse_model_output;
pub use prompt::build_prompt;
pub use rules::RuleClassifier;

use async_trait::async_trait;
use prospect_core::config::{ClassifierBackend, ClassifierConfig};
use prospect_core::error::RouterError;
use prospect_core::types::{Intent, SearchRequest};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Intent used when the classifier cannot produce a usable answer.
pub const FALLBACK_INTENT: Intent = Intent::Person;

/// Why the fallback policy was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Model answered, but not with a usable JSON object.
    MalformedOutput(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MalformedOutput(d) => write!(f, "malformed model output: {}", d),
        }
    }
}

/// Result of classifying one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub request: SearchRequest,
    /// Set when the request is the fallback rather than the model's answer.
    pub fallback: Option<FallbackReason>,
}

impl Classification {
    pub fn new(request: SearchRequest) -> Self {
        Self {
            request,
            fallback: None,
        }
    }

    /// The fallback policy: `person` with no parameters.
    pub fn fallback(reason: FallbackReason) -> Self {
        warn!(%reason, intent = %FALLBACK_INTENT, "classification fallback");
        Self {
            request: SearchRequest::empty(FALLBACK_INTENT),
            fallback: Some(reason),
        }
    }

    pub fn intent(&self) -> Intent {
        self.request.intent()
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Text generation seam; the classifier only needs raw completions.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `text`. Malformed model output never produces `Err`. An
    /// explicitly named unsupported intent or a failed model call does.
    async fn classify(&self, text: &str) -> Result<Classification, RouterError>;
}

/// Prompt a generative model and parse its answer.
pub struct ModelClassifier<M> {
    model: M,
}

impl<M: GenerativeModel> ModelClassifier<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

#[async_trait]
impl<M: GenerativeModel> Classifier for ModelClassifier<M> {
    async fn classify(&self, text: &str) -> Result<Classification, RouterError> {
        let prompt = build_prompt(text);
        let raw = self.model.generate(&prompt).await.map_err(|e| {
            let detail = format!("{:#}", e);
            warn!(error = %detail, "model call failed");
            RouterError::ClassifierUnavailable(detail)
        })?;
        let classification = parse_model_output(&raw)?;
        info!(
            intent = %classification.intent(),
            fallback = classification.is_fallback(),
            "query classified"
        );
        Ok(classification)
    }
}

/// Build the configured classifier.
pub fn classifier_from_config(
    config: &ClassifierConfig,
) -> Result<Arc<dyn Classifier>, RouterError> {
    match config.backend {
        ClassifierBackend::Ollama => {
            let model = OllamaModel::new(config)?;
            Ok(Arc::new(ModelClassifier::new(model)))
        }
        ClassifierBackend::Rules => Ok(Arc::new(RuleClassifier)),
    }
}
