use crate::types::{node_id_from_value, ContentItem};
use serde_json::Value;

const CONTENT_PREFIX: &str = "/content/";
const PAGE_SUFFIX: &str = ".htm";
const SENTINEL_HELP_ID: &str = "___";
const RELEASE_NOTES_PREFIX: &str = "release-notes/";

/// Turn one parsed TOC chunk (`url -> {t: [title], i: [node id]}`) into content items.
///
/// Record order follows the payload. Sentinel and release-note pages are dropped.
pub fn collect_chunk_items(chunk: &Value) -> Vec<ContentItem> {
    let Some(records) = chunk.as_object() else {
        return Vec::new();
    };

    let mut items = Vec::with_capacity(records.len());
    for (url, record) in records {
        let help_id = url.replace(CONTENT_PREFIX, "").replace(PAGE_SUFFIX, "");
        if is_excluded(&help_id) {
            log::debug!("Skipping help record {url}");
            continue;
        }

        let title = record
            .get("t")
            .and_then(|t| t.get(0))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let help_tree_id = record
            .get("i")
            .and_then(|i| i.get(0))
            .and_then(node_id_from_value)
            .unwrap_or_default();

        items.push(ContentItem {
            title,
            help_id,
            help_tree_id,
        });
    }
    items
}

/// Concatenate per-chunk items, keeping chunk order.
pub fn merge_chunks(chunks: impl IntoIterator<Item = Vec<ContentItem>>) -> Vec<ContentItem> {
    chunks.into_iter().flatten().collect()
}

/// Sentinel pages (`___`, at any depth) and release notes are internal to the help site.
pub fn is_excluded(help_id: &str) -> bool {
    help_id.rsplit('/').next() == Some(SENTINEL_HELP_ID)
        || help_id.starts_with(RELEASE_NOTES_PREFIX)
}
