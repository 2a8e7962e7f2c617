use anyhow::Result;
use prospect_classify::classifier_from_config;
use prospect_core::config::Config;
use serde_json::json;

pub async fn run(config: &Config, query: &str) -> Result<()> {
    let classifier = classifier_from_config(&config.classifier)?;
    let classification = classifier.classify(query).await?;
    super::print_json(&json!({
        "search_type": classification.intent(),
        "parameters": classification.request.to_query_params(),
        "fallback": classification.is_fallback(),
        "fallback_reason": classification.fallback.as_ref().map(|r| r.to_string()),
    }))
}
