use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const TOOLS_PREFIX: &str = "perfecto";

pub const SUPPORT_MESSAGE: &str =
    "If the problem persists, please contact Perfecto support at https://support.perfecto.io/ and include the error above.";

/// Envelope returned by every Perfecto tool.
///
/// Absent fields are omitted on the wire so agents only see what a call actually produced.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, JsonSchema)]
pub struct ToolResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Vec<String>>,
}

impl ToolResult {
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::ok(serde_json::to_value(value)?))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            warning: Some(vec![message.into()]),
            ..Default::default()
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.append_info([info.into()]);
        self
    }

    pub fn append_warnings(&mut self, messages: impl IntoIterator<Item = String>) {
        self.warning.get_or_insert_with(Vec::new).extend(messages);
    }

    pub fn append_info(&mut self, messages: impl IntoIterator<Item = String>) {
        self.info.get_or_insert_with(Vec::new).extend(messages);
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// One page of a listing that is sliced locally.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub page: usize,
    pub offset: usize,
    pub next_offset: usize,
    pub has_more: bool,
}

impl<T> PaginationResult<T> {
    /// Build the page descriptor for `page_index` (1-based) given the items already sliced for it.
    pub fn for_page(items: Vec<T>, page_index: usize, page_size: usize, has_more: bool) -> Self {
        let page = page_index.max(1);
        let offset = page_size * (page - 1);
        Self {
            count: items.len(),
            items,
            total: None,
            page,
            offset,
            next_offset: offset + page_size,
            has_more,
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
