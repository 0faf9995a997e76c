use rmcp::schemars;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request shape shared by every Perfecto tool: an action id plus its arguments.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Default)]
pub struct ActionRequest {
    /// The action id to execute.
    pub action: String,

    /// Dictionary with parameters for the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

/// Arguments that do not match what the selected action expects.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct InvalidArgs(String);

impl ActionRequest {
    /// Decode the arguments of the selected action; missing or null args mean "all defaults".
    pub(crate) fn parse_args<T: DeserializeOwned>(&self) -> Result<T, InvalidArgs> {
        let args = match &self.args {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(args) => args.clone(),
        };
        serde_json::from_value(args)
            .map_err(|err| InvalidArgs(format!("Invalid args for action {}: {err}", self.action)))
    }
}
