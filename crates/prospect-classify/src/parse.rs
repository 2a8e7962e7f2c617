use crate::{Classification, FallbackReason};
use prospect_core::error::RouterError;
use prospect_core::types::{Intent, SearchRequest};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("static regex"));

/// Locate the outermost JSON object in a model completion.
///
/// Reasoning models prefix their answer with a `<think>` block, and most
/// models like to wrap JSON in Markdown fences; both are skipped.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start_from = THINK_BLOCK.find_iter(raw).last().map_or(0, |m| m.end());
    let body = &raw[start_from..];
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (end > start).then(|| &body[start..=end])
}

/// Last top-level `{...}` in `text`, tracking JSON strings so braces inside
/// them do not count.
fn last_balanced_object(text: &str) -> Option<&str> {
    let mut last = None;
    let mut depth = 0usize;
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    last = Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    last
}

/// Parse the outermost object, retrying with the last complete object when
/// earlier text (an unterminated `<think>` draft, say) breaks the slice.
fn parse_object(raw: &str) -> Result<Value, String> {
    let object = extract_json_object(raw).ok_or("no JSON object in model output")?;
    serde_json::from_str(object).or_else(|e| {
        last_balanced_object(object)
            .filter(|candidate| *candidate != object)
            .and_then(|candidate| serde_json::from_str(candidate).ok())
            .ok_or_else(|| e.to_string())
    })
}

/// Parse a model completion into a classification.
///
/// Anything unusable becomes the fallback classification. The only error is
/// a well-formed answer naming an intent outside company/person/job.
pub fn parse_model_output(raw: &str) -> Result<Classification, RouterError> {
    let value = match parse_object(raw) {
        Ok(v) => v,
        Err(reason) => {
            return Ok(Classification::fallback(FallbackReason::MalformedOutput(
                reason,
            )));
        }
    };

    let Some(search_type) = value.get("search_type").and_then(Value::as_str) else {
        return Ok(Classification::fallback(FallbackReason::MalformedOutput(
            "missing search_type".into(),
        )));
    };
    let intent: Intent = search_type.parse()?;

    let parameters = value.get("parameters").cloned().unwrap_or(Value::Null);
    match SearchRequest::from_parameters(intent, &parameters) {
        Ok(request) => Ok(Classification::new(request)),
        Err(e) => Ok(Classification::fallback(FallbackReason::MalformedOutput(
            format!("parameters do not fit the {} schema: {}", intent, e),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_core::types::{CompanySearch, JobSearch, PersonSearch};

    fn assert_fallback(raw: &str) {
        let result = parse_model_output(raw).unwrap();
        assert!(result.is_fallback(), "expected fallback for {raw:?}");
        assert_eq!(result.request, SearchRequest::empty(Intent::Person));
    }

    #[test]
    fn plain_json_answer() {
        let result = parse_model_output(
            r#"{"search_type": "company", "parameters": {"country": "DE", "city": "Berlin"}}"#,
        )
        .unwrap();
        assert!(!result.is_fallback());
        assert_eq!(
            result.request,
            SearchRequest::Company(CompanySearch {
                country: Some("DE".into()),
                city: Some("Berlin".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn think_block_and_code_fence_are_skipped() {
        let raw = "<think>\nThe user wants {people}? No, jobs.\n</think>\n```json\n{\"search_type\":\"job\",\"parameters\":{\"keyword\":\"data scientist\",\"flexibility\":\"remote\"}}\n```";
        let result = parse_model_output(raw).unwrap();
        assert_eq!(
            result.request,
            SearchRequest::Job(JobSearch {
                keyword: Some("data scientist".into()),
                flexibility: Some("remote".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn unterminated_think_draft_is_skipped() {
        let raw = "<think>maybe {\"search_type\":\"company\"} no... jobs\n{\"search_type\":\"job\",\"parameters\":{\"keyword\":\"rust {core}\"}}";
        let result = parse_model_output(raw).unwrap();
        assert!(!result.is_fallback());
        assert_eq!(
            result.request,
            SearchRequest::Job(JobSearch {
                keyword: Some("rust {core}".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn last_balanced_object_ignores_braces_in_strings() {
        assert_eq!(
            last_balanced_object(r#"{"a":1} noise {"b":"}{"}"#),
            Some(r#"{"b":"}{"}"#)
        );
        assert_eq!(last_balanced_object("{ unclosed"), None);
    }

    #[test]
    fn missing_parameters_means_empty_request() {
        let result = parse_model_output(r#"{"search_type":"Person"}"#).unwrap();
        assert!(!result.is_fallback());
        assert_eq!(result.request, SearchRequest::Person(PersonSearch::default()));
    }

    #[test]
    fn malformed_outputs_fall_back() {
        assert_fallback("");
        assert_fallback("Sorry, I can't help with that.");
        assert_fallback("{\"search_type\": \"job\", ");
        assert_fallback(r#"{"parameters": {"keyword": "x"}}"#);
        assert_fallback(r#"{"search_type": 3}"#);
        assert_fallback(r#"{"search_type": "company", "parameters": {"page_size": "many"}}"#);
        assert_fallback(r#"{"search_type": "job", "parameters": "remote"}"#);
    }

    #[test]
    fn unknown_search_type_is_rejected() {
        let err = parse_model_output(r#"{"search_type":"school","parameters":{}}"#).unwrap_err();
        assert!(matches!(err, RouterError::UnsupportedIntent(ref s) if s == "school"));
    }

    #[test]
    fn undeclared_parameters_are_dropped() {
        let result = parse_model_output(
            r#"{"search_type":"person","parameters":{"skills":"sql","location":"Canada"}}"#,
        )
        .unwrap();
        let params = result.request.to_query_params();
        assert_eq!(params.len(), 1);
        assert!(params.get("location").is_none());
    }
}
