use anyhow::{Context, Result};
use prospect_classify::classifier_from_config;
use prospect_core::config::Config;
use tracing::info;

pub async fn run(config: &Config, query: &str, via_gateway: bool) -> Result<()> {
    let classifier = classifier_from_config(&config.classifier)?;
    let backend = super::backend(config, via_gateway)?;

    let routed = prospect_tools::route_query(classifier.as_ref(), backend.as_ref(), query)
        .await
        .context("search failed")?;
    info!(
        intent = %routed.classification.intent(),
        fallback = routed.classification.is_fallback(),
        "search complete"
    );

    match routed.body.json() {
        Ok(value) => super::print_json(&value),
        Err(_) => {
            println!("{}", String::from_utf8_lossy(&routed.body.bytes));
            Ok(())
        }
    }
}
