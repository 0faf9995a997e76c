use crate::bucket::bucketize;
use crate::endpoints::HelpEndpoints;
use crate::error::{HelpIndexError, Result};
use crate::merge::{collect_chunk_items, merge_chunks};
use crate::normalize::flatten_tree;
use crate::notation::parse_notation;
use crate::source::HelpSource;
use crate::types::{ContentItem, HelpIndex, RootIndex};
use futures::future::try_join_all;

/// Fetch and parse the root TOC payload.
pub async fn fetch_root_index(
    source: &dyn HelpSource,
    endpoints: &HelpEndpoints,
) -> Result<RootIndex> {
    let text = source.fetch_text(&endpoints.index_url).await?;
    let value = parse_notation(&text)?;
    if !value.is_object() {
        return Err(HelpIndexError::malformed(
            &endpoints.index_url,
            "root index is not an object",
        ));
    }
    Ok(RootIndex::from_value(&value))
}

/// Fetch every TOC chunk concurrently and return their items in chunk order.
///
/// The first failing chunk fails the whole call.
pub async fn fetch_chunks(
    source: &dyn HelpSource,
    endpoints: &HelpEndpoints,
    root: &RootIndex,
) -> Result<Vec<Vec<ContentItem>>> {
    let fetches = (0..root.num_chunks).map(|index| {
        let url = endpoints.chunk_url(&root.chunk_prefix, index);
        async move {
            let text = source.fetch_text(&url).await?;
            let chunk = parse_notation(&text)?;
            if !chunk.is_object() {
                return Err(HelpIndexError::malformed(url, "chunk is not an object"));
            }
            Ok::<_, HelpIndexError>(collect_chunk_items(&chunk))
        }
    });
    try_join_all(fetches).await
}

/// Run the full pipeline: root index, chunks, flattening, merge and bucketing.
///
/// Nothing is shared until the returned index is complete.
pub async fn load_help_index(
    source: &dyn HelpSource,
    endpoints: &HelpEndpoints,
) -> Result<HelpIndex> {
    let root = fetch_root_index(source, endpoints).await?;
    let flat = flatten_tree(&root.tree);
    let chunks = fetch_chunks(source, endpoints, &root).await?;
    let merged = merge_chunks(chunks);
    let index = bucketize(merged, &flat);

    log::info!(
        "Loaded help index: {} TOC nodes, {} chunks, {} categories, {} pages",
        flat.len(),
        root.num_chunks,
        index.tree.len(),
        index.page_count()
    );

    Ok(index)
}
