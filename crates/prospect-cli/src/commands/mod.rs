pub mod call;
pub mod classify;
pub mod search;
pub mod serve;
pub mod tools;

use anyhow::Result;
use prospect_core::config::Config;
use prospect_provider::{GatewayClient, ProviderClient, SearchBackend};
use serde_json::Value;
use std::sync::Arc;

/// Backend for CLI searches: the provider directly, or the gateway.
pub(crate) fn backend(config: &Config, via_gateway: bool) -> Result<Arc<dyn SearchBackend>> {
    if via_gateway {
        Ok(Arc::new(GatewayClient::new(&config.gateway)?))
    } else {
        config.validate()?;
        Ok(Arc::new(ProviderClient::new(&config.provider)?))
    }
}

pub(crate) fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
