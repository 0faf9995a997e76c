use crate::types::{node_id_from_value, FlatIndex, IndexNode};
use serde_json::Value;

const ID_FIELD: &str = "i";
const CHILDREN_FIELD: &str = "n";
const CHAPTER_FIELD: &str = "c";

/// Flatten the TOC tree rooted at `root` into an id-keyed table.
///
/// The root itself is not recorded; traversal starts from its immediate children. Nodes without
/// an id are skipped but their children are still visited.
pub fn flatten_tree(root: &Value) -> FlatIndex {
    let mut flat = FlatIndex::new();
    let mut stack: Vec<&Value> = children_of(root).iter().collect();

    while let Some(node) = stack.pop() {
        let children = children_of(node);

        if let Some(id) = node.get(ID_FIELD).and_then(node_id_from_value) {
            let metadata = node
                .as_object()
                .map(|fields| {
                    fields
                        .iter()
                        .filter(|(key, _)| {
                            !matches!(key.as_str(), ID_FIELD | CHILDREN_FIELD | CHAPTER_FIELD)
                        })
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect()
                })
                .unwrap_or_default();
            let child_ids = children
                .iter()
                .filter_map(|child| child.get(ID_FIELD).and_then(node_id_from_value))
                .collect();

            flat.insert(
                id.clone(),
                IndexNode {
                    id,
                    metadata,
                    child_ids,
                },
            );
        }

        stack.extend(children);
    }

    flat
}

fn children_of(node: &Value) -> &[Value] {
    node.get(CHILDREN_FIELD)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
