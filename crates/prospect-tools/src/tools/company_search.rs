use super::{ToolDefinition, input_schema};
use prospect_core::types::Intent;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "company_search".into(),
        description: "Search for companies on LinkedIn by location, industry, size and funding."
            .into(),
        input_schema: input_schema(Intent::Company),
    }
}
