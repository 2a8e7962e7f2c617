//! Tool adapters: one callable per intent, delegating to a search backend.

pub mod adapter;
pub mod tools;

pub use adapter::{
    RoutedResult, call_tool, company_search, job_search, person_search, route_query, search,
};
pub use tools::{ToolDefinition, list_tools, tool_intent, tool_name};
