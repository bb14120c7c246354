use mcp_core::{Content, ToolError};
use serde_json::Value;

pub fn lookup(params: Value) -> Result<Vec<Content>, ToolError> {
    let name = params["name"].as_str().ok_or(ToolError::InvalidParameters("missing name"))?;
    if name.is_empty() {
        return Err(ToolError::NotFound(format!("no tool named {}", name)));
    }
    Ok(vec![])
}

pub fn run(cmd: &str) -> Result<String, ToolError> {
    std::process::Command::new(cmd)
        .output()
        .map_err(|e| ToolError::ExecutionError(e.to_string()))?;
    Ok(String::new())
}
