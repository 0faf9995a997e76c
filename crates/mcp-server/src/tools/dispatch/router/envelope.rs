use super::super::{CallToolResult, Content, McpError};
use crate::http::ApiError;
use crate::tools::schemas::action::InvalidArgs;
use crate::tools::skills_store::SkillError;
use perfecto_help_index::HelpIndexError;
use perfecto_protocol::{serialize_json, ToolResult, SUPPORT_MESSAGE};
use serde::Serialize;

/// Serialize a tool result; it is flagged as an MCP error only when it carries no payload.
pub(in crate::tools::dispatch) fn render(result: ToolResult) -> Result<CallToolResult, McpError> {
    let text = serialize_json(&result).map_err(|err| {
        McpError::internal_error(format!("Failed to serialize tool result: {err:#}"), None)
    })?;
    if result.is_error() && result.result.is_none() {
        Ok(CallToolResult::error(vec![Content::text(text)]))
    } else {
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

pub(in crate::tools::dispatch) fn success<T: Serialize>(value: &T) -> anyhow::Result<ToolResult> {
    ToolResult::from_serializable(value)
}

pub(in crate::tools::dispatch) fn unknown_action(action: &str, manager: &str) -> ToolResult {
    ToolResult::error(format!("Action {action} not found in {manager} tool"))
}

/// Turn a failed action into its envelope.
///
/// Expected faults keep their own message, transport faults are prefixed, anything else also
/// gets the support footer.
pub(in crate::tools::dispatch) fn failure(err: anyhow::Error) -> ToolResult {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        if api.is_user_facing() {
            return ToolResult::error(api.to_string());
        }
        if api.is_http() {
            return ToolResult::error(format!("Error: {err:#}"));
        }
    }
    if let Some(help) = err.downcast_ref::<HelpIndexError>() {
        if matches!(help, HelpIndexError::InvalidCredentials) {
            return ToolResult::error(help.to_string());
        }
        if help.is_http() {
            return ToolResult::error(format!("Error: {err:#}"));
        }
    }
    if err.downcast_ref::<SkillError>().is_some() || err.downcast_ref::<InvalidArgs>().is_some() {
        return ToolResult::error(err.to_string());
    }

    log::error!("Tool action failed: {err:#}");
    ToolResult::error(format!("Error: {err:#}\n{SUPPORT_MESSAGE}"))
}

/// Collapse an action outcome into a rendered tool result.
pub(in crate::tools::dispatch) fn finish(
    outcome: anyhow::Result<ToolResult>,
) -> Result<CallToolResult, McpError> {
    render(outcome.unwrap_or_else(failure))
}
