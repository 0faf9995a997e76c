use crate::error::Result;
use async_trait::async_trait;

/// Where help payloads come from.
///
/// The server plugs its HTTP client in here; tests use an in-memory map.
#[async_trait]
pub trait HelpSource: Send + Sync {
    /// GET `url` and return the body as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
