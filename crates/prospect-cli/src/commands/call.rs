use anyhow::{Context, Result};
use prospect_core::config::Config;
use serde_json::Value;

pub async fn run(config: &Config, tool: &str, args: &str, via_gateway: bool) -> Result<()> {
    let arguments: Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;
    let backend = super::backend(config, via_gateway)?;
    let value = prospect_tools::call_tool(backend.as_ref(), tool, &arguments)
        .await
        .with_context(|| format!("tool {} failed", tool))?;
    super::print_json(&value)
}
