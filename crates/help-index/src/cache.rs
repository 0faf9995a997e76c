use crate::error::Result;
use crate::types::HelpIndex;
use std::future::Future;
use tokio::sync::OnceCell;

/// Process-lifetime cache of the help index.
///
/// The first caller runs the loader; callers arriving while it runs wait for that same build.
/// A failed build leaves the cache empty so the next call tries again. Once populated the index is
/// never rebuilt.
#[derive(Debug, Default)]
pub struct HelpTreeCache {
    cell: OnceCell<HelpIndex>,
}

impl HelpTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<&HelpIndex>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HelpIndex>>,
    {
        self.cell.get_or_try_init(load).await
    }

    /// The index, if a build already completed.
    pub fn get(&self) -> Option<&HelpIndex> {
        self.cell.get()
    }

    pub fn is_populated(&self) -> bool {
        self.cell.initialized()
    }
}
