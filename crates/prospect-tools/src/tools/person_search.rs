use super::{ToolDefinition, input_schema};
use prospect_core::types::Intent;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "person_search".into(),
        description: "Search for people on LinkedIn by name, title, skills, company or school."
            .into(),
        input_schema: input_schema(Intent::Person),
    }
}
