use crate::types::{BucketKey, ContentItem, FlatIndex, HelpIndex, NodeEntry, SELF_SUBCATEGORY};
use std::collections::hash_map::Entry;

/// Split a help path into category, subcategory and the remaining id.
///
/// Paths with at most two segments have no subcategory level and land in `self`.
pub fn split_bucket(help_id: &str) -> BucketKey {
    let sections: Vec<&str> = help_id.split('/').collect();
    let category = sections[0];
    if sections.len() > 2 {
        BucketKey::new(category, sections[1], sections[2..].join("/"))
    } else {
        BucketKey::new(category, SELF_SUBCATEGORY, sections[1..].join("/"))
    }
}

/// Group merged items into the category tree and build both lookup indices in one pass.
///
/// Every item is listed in the tree. Only the first item claiming a bucket key is indexed, and
/// items whose tree id is missing from `flat` are never indexed, so every indexed node resolves
/// to its children.
pub fn bucketize(items: Vec<ContentItem>, flat: &FlatIndex) -> HelpIndex {
    let mut index = HelpIndex::default();

    for mut item in items {
        let key = split_bucket(&item.help_id);
        item.help_id = key.help_id.clone();
        let tree_id = item.help_tree_id.clone();

        index
            .tree
            .entry(key.category.clone())
            .or_default()
            .entry(key.subcategory.clone())
            .or_default()
            .push(item);

        let Some(node) = flat.get(&tree_id) else {
            log::debug!(
                "Help page {} references unknown TOC node '{tree_id}'",
                key.index_key()
            );
            continue;
        };

        // A later record with an already claimed key is a duplicate of that page.
        match index.items.entry(key.index_key()) {
            Entry::Occupied(_) => continue,
            Entry::Vacant(slot) => {
                slot.insert(tree_id.clone());
            }
        }

        if let Entry::Vacant(slot) = index.nodes.entry(tree_id) {
            slot.insert(NodeEntry {
                category: key.category,
                subcategory: key.subcategory,
                help_id: key.help_id,
                sub_nodes: node.child_ids.clone(),
            });
        }
    }

    index
}
