//! # Perfecto Help Index
//!
//! Turns the Perfecto documentation site into a two-level catalog agents can browse.
//!
//! ## Architecture
//!
//! ```text
//! Root TOC (object notation)
//!     │
//!     ├──> Notation parser → serde_json::Value
//!     │
//!     ├──> Normalizer: node tree → flat id → {metadata, child ids}
//!     │
//!     ├──> Chunk fetch (concurrent, joined)
//!     │      └─> Merger: url records → ContentItem[], sentinel and release notes dropped
//!     │
//!     └──> Bucketizer
//!            ├─> tree:  category → subcategory → ContentItem[]
//!            ├─> items: "category:subcategory:id" → node id
//!            └─> nodes: node id → {category, subcategory, id, children}
//! ```
//!
//! The result is cached for the lifetime of the owning [`HelpCatalog`]: built once on first use,
//! shared by every caller, never rebuilt.

mod bucket;
mod cache;
mod catalog;
mod endpoints;
mod error;
mod loader;
mod merge;
mod normalize;
mod notation;
mod page;
mod source;
mod types;

pub use bucket::{bucketize, split_bucket};
pub use cache::HelpTreeCache;
pub use catalog::{
    AdditionalHelpPages, CategorySummary, ExtendedCommandList, HelpCatalog, HelpPageOutcome,
    HelpPageResult, HelpReadResult, SubcategoryContent,
};
pub use endpoints::{HelpEndpoints, DEFAULT_HELP_BASE_URL};
pub use error::{HelpIndexError, Result};
pub use loader::{fetch_chunks, fetch_root_index, load_help_index};
pub use merge::{collect_chunk_items, is_excluded, merge_chunks};
pub use normalize::flatten_tree;
pub use notation::parse_notation;
pub use page::{extract_command_links, format_help_page, ExtendedCommand, HelpPage, TOC_MARKER};
pub use source::HelpSource;
pub use types::{
    BucketKey, ContentItem, FlatIndex, HelpIndex, HelpTree, IndexNode, NodeEntry, NodeId,
    RootIndex, SELF_SUBCATEGORY,
};
