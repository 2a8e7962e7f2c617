use anyhow::Result;
use prospect_core::config::Config;

pub async fn run(config: &Config, bind: Option<&str>) -> Result<()> {
    prospect_server::run_http_server(config, bind)
        .await
        .map_err(|e| anyhow::anyhow!("gateway error: {}", e))
}
