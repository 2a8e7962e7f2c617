use crate::{ProviderBody, SearchBackend, read_response};
use async_trait::async_trait;
use prospect_core::config::ProviderConfig;
use prospect_core::error::RouterError;
use prospect_core::types::SearchRequest;
use tracing::debug;

/// Direct client for the provider's search endpoints.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl ProviderClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, RouterError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RouterError::unreachable)?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl SearchBackend for ProviderClient {
    async fn search(&self, request: &SearchRequest) -> Result<ProviderBody, RouterError> {
        let intent = request.intent();
        let url = self.config.endpoint(intent);
        let params = request.to_query_params();
        debug!(%intent, url, params = ?params, "calling provider");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.api_key)
            .query(&params.to_pairs())
            .send()
            .await
            .map_err(RouterError::unreachable)?;

        read_response(response).await
    }
}
