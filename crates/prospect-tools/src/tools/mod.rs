use prospect_core::types::{Intent, ParamSpec};
use serde::Serialize;
use serde_json::{Map, Value, json};

mod company_search;
mod job_search;
mod person_search;

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool declarations for agent frameworks, one per intent.
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        company_search::definition(),
        person_search::definition(),
        job_search::definition(),
    ]
}

pub fn tool_name(intent: Intent) -> &'static str {
    match intent {
        Intent::Company => "company_search",
        Intent::Person => "person_search",
        Intent::Job => "job_search",
    }
}

pub fn tool_intent(name: &str) -> Option<Intent> {
    Intent::ALL.into_iter().find(|i| tool_name(*i) == name)
}

fn property(param: &ParamSpec) -> Value {
    let mut prop = Map::new();
    prop.insert("type".into(), json!(param.kind.as_str()));
    let description = match param.default {
        Some(d) => format!("{} (default: {})", param.description, d.to_json()),
        None => param.description.to_string(),
    };
    prop.insert("description".into(), json!(description));
    if let Some(d) = param.default {
        prop.insert("default".into(), d.to_json());
    }
    Value::Object(prop)
}

/// JSON schema of an intent's parameters. Every parameter is optional.
pub(crate) fn input_schema(intent: Intent) -> Value {
    let properties: Map<String, Value> = intent
        .params()
        .iter()
        .map(|p| (p.name.to_string(), property(p)))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
    })
}
