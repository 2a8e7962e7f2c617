use super::{ToolDefinition, input_schema};
use prospect_core::types::Intent;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "job_search".into(),
        description: "Search for job postings on LinkedIn by keyword, type, level and flexibility."
            .into(),
        input_schema: input_schema(Intent::Job),
    }
}
