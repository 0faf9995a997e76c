use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Opaque identifier of a node in the help TOC tree.
///
/// The payload uses integers; string ids are accepted too and both are kept in string form.
pub type NodeId = String;

/// Subcategory used when a help path has no second level.
pub const SELF_SUBCATEGORY: &str = "self";

/// One node of the TOC tree, detached from its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexNode {
    pub id: NodeId,
    /// Every field of the source node except its id and children.
    pub metadata: Map<String, Value>,
    pub child_ids: Vec<NodeId>,
}

/// Flattened TOC tree keyed by node id.
pub type FlatIndex = HashMap<NodeId, IndexNode>;

/// A documentation page as listed in the TOC chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    /// Raw slash path before bucketing, the id inside its subcategory afterwards.
    pub help_id: String,
    pub help_tree_id: NodeId,
}

/// Position of a page inside the category/subcategory hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub category: String,
    pub subcategory: String,
    pub help_id: String,
}

impl BucketKey {
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        help_id: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            help_id: help_id.into(),
        }
    }

    /// Key used by [`HelpIndex::items`].
    pub fn index_key(&self) -> String {
        format!("{}:{}:{}", self.category, self.subcategory, self.help_id)
    }
}

/// Where a TOC node landed after bucketing, plus its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub category: String,
    pub subcategory: String,
    pub help_id: String,
    pub sub_nodes: Vec<NodeId>,
}

/// `category -> subcategory -> pages`, both levels in the order they were first seen.
pub type HelpTree = IndexMap<String, IndexMap<String, Vec<ContentItem>>>;

/// Everything built from one load of the help site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelpIndex {
    pub tree: HelpTree,
    /// `category:subcategory:help_id -> tree id`, first writer wins.
    pub items: HashMap<String, NodeId>,
    /// `tree id -> entry`, first writer wins.
    pub nodes: HashMap<NodeId, NodeEntry>,
}

impl HelpIndex {
    pub fn subcategory(&self, category: &str, subcategory: &str) -> Option<&[ContentItem]> {
        self.tree
            .get(category)
            .and_then(|subs| subs.get(subcategory))
            .map(Vec::as_slice)
    }

    /// Resolve a bucket key to the entries of its children in the TOC.
    ///
    /// Children that never appeared as a page are skipped. `None` means the key is unknown.
    pub fn child_entries(&self, key: &BucketKey) -> Option<Vec<NodeEntry>> {
        let node_id = self.items.get(&key.index_key())?;
        let entry = self.nodes.get(node_id)?;
        Some(
            entry
                .sub_nodes
                .iter()
                .filter_map(|child| self.nodes.get(child).cloned())
                .collect(),
        )
    }

    pub fn page_count(&self) -> usize {
        self.tree
            .values()
            .flat_map(|subs| subs.values())
            .map(Vec::len)
            .sum()
    }
}

/// Header of the root TOC payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RootIndex {
    pub num_chunks: usize,
    pub chunk_prefix: String,
    pub tree: Value,
}

pub const DEFAULT_NUM_CHUNKS: usize = 6;
pub const DEFAULT_CHUNK_PREFIX: &str = "perfecto_help_Chunk";

impl RootIndex {
    pub fn from_value(value: &Value) -> Self {
        let num_chunks = value
            .get("numchunks")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_NUM_CHUNKS);
        let chunk_prefix = value
            .get("prefix")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CHUNK_PREFIX)
            .to_string();
        let tree = value
            .get("tree")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        Self {
            num_chunks,
            chunk_prefix,
            tree,
        }
    }
}

/// Render a payload id (number or string) as a [`NodeId`].
pub fn node_id_from_value(value: &Value) -> Option<NodeId> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_index_defaults() {
        let root = RootIndex::from_value(&json!({}));
        assert_eq!(root.num_chunks, DEFAULT_NUM_CHUNKS);
        assert_eq!(root.chunk_prefix, DEFAULT_CHUNK_PREFIX);
        assert_eq!(root.tree, json!({}));

        let root = RootIndex::from_value(&json!({ "numchunks": 2, "prefix": "p_", "tree": { "n": [] } }));
        assert_eq!(root.num_chunks, 2);
        assert_eq!(root.chunk_prefix, "p_");
    }

    #[test]
    fn node_ids_accept_numbers_and_strings() {
        assert_eq!(node_id_from_value(&json!(12)), Some("12".to_string()));
        assert_eq!(node_id_from_value(&json!("t1")), Some("t1".to_string()));
        assert_eq!(node_id_from_value(&json!(null)), None);
    }
}
