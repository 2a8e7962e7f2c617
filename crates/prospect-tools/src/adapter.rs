use crate::tools::tool_intent;
use prospect_classify::{Classification, Classifier};
use prospect_core::error::RouterError;
use prospect_core::types::{CompanySearch, JobSearch, PersonSearch, SearchRequest};
use prospect_provider::{ProviderBody, SearchBackend};
use serde_json::Value;
use tracing::info;

/// Run one search and parse the provider's JSON.
pub async fn search(
    backend: &dyn SearchBackend,
    request: &SearchRequest,
) -> Result<Value, RouterError> {
    backend.search(request).await?.json()
}

pub async fn company_search(
    backend: &dyn SearchBackend,
    params: CompanySearch,
) -> Result<Value, RouterError> {
    search(backend, &SearchRequest::Company(params)).await
}

pub async fn person_search(
    backend: &dyn SearchBackend,
    params: PersonSearch,
) -> Result<Value, RouterError> {
    search(backend, &SearchRequest::Person(params)).await
}

pub async fn job_search(
    backend: &dyn SearchBackend,
    params: JobSearch,
) -> Result<Value, RouterError> {
    search(backend, &SearchRequest::Job(params)).await
}

/// Invoke a declared tool by name with loosely typed arguments.
pub async fn call_tool(
    backend: &dyn SearchBackend,
    name: &str,
    arguments: &Value,
) -> Result<Value, RouterError> {
    let intent = tool_intent(name).ok_or_else(|| RouterError::UnknownTool(name.to_string()))?;
    let request =
        SearchRequest::from_parameters(intent, arguments).map_err(RouterError::invalid_parameters)?;
    search(backend, &request).await
}

/// Outcome of routing a free-text query.
#[derive(Debug, Clone)]
pub struct RoutedResult {
    pub classification: Classification,
    pub body: ProviderBody,
}

/// Classify `text`, then forward the resulting request.
pub async fn route_query(
    classifier: &dyn Classifier,
    backend: &dyn SearchBackend,
    text: &str,
) -> Result<RoutedResult, RouterError> {
    let classification = classifier.classify(text).await?;
    info!(
        intent = %classification.intent(),
        fallback = classification.is_fallback(),
        "routing query"
    );
    let body = backend.search(&classification.request).await?;
    Ok(RoutedResult {
        classification,
        body,
    })
}
