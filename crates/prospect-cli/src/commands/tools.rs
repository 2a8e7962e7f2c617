use anyhow::Result;

pub fn run() -> Result<()> {
    let tools = serde_json::to_value(prospect_tools::list_tools())?;
    super::print_json(&tools)
}
