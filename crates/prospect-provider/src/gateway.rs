use crate::{ProviderBody, SearchBackend, read_response};
use async_trait::async_trait;
use prospect_core::config::GatewayConfig;
use prospect_core::error::RouterError;
use prospect_core::types::SearchRequest;
use serde_json::Value;
use tracing::debug;

/// Client for the gateway's `/search/{intent}` endpoints.
///
/// The gateway holds the provider credential, so no token is attached here.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, RouterError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RouterError::unreachable)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for GatewayClient {
    async fn search(&self, request: &SearchRequest) -> Result<ProviderBody, RouterError> {
        let intent = request.intent();
        let url = format!("{}/search/{}", self.base_url, intent);
        let params = request.to_query_params();
        debug!(%intent, url = %url, params = ?params, "calling gateway");

        let response = self
            .http
            .get(&url)
            .query(&params.to_pairs())
            .send()
            .await
            .map_err(RouterError::unreachable)?;

        read_response(response).await.map_err(unwrap_relayed_failure)
    }
}

/// The gateway wraps provider failures in its error envelope, carrying the
/// provider's status and body under `error.data`. Restore those so callers
/// see the same failure as a direct provider call.
fn unwrap_relayed_failure(err: RouterError) -> RouterError {
    let RouterError::ProviderRequestFailed { status, body } = err else {
        return err;
    };
    let relayed = serde_json::from_str::<Value>(&body).ok().and_then(|envelope| {
        let data = envelope.get("error")?.get("data")?;
        let inner = data.get("body")?.as_str()?.to_string();
        let inner_status = data
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(status);
        Some((inner_status, inner))
    });
    match relayed {
        Some((status, body)) => RouterError::ProviderRequestFailed { status, body },
        None => RouterError::ProviderRequestFailed { status, body },
    }
}
