pub mod memory;
pub mod socket;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::prompts::Prompt;

pub use memory::MemoryBackend;
pub use socket::SocketBackend;

/// The prompt store as seen from the HUD: named asynchronous calls.
///
/// Implementations must not filter or reorder beyond what the store itself
/// defines; the HUD shows exactly what `get_prompts` returns.
#[async_trait]
pub trait PromptBackend: Send + Sync {
    /// Prompts matching `query` (all prompts when `None`), newest first.
    async fn get_prompts(&self, query: Option<String>) -> Result<Vec<Prompt>, BackendError>;

    /// Total stored prompts, independent of any query.
    async fn get_prompt_count(&self) -> Result<u64, BackendError>;

    /// `Ok(false)` when an equal prompt already exists.
    async fn create_prompt(&self, text: String) -> Result<bool, BackendError>;

    /// `Ok(false)` when no prompt has that id.
    async fn update_prompt(&self, id: String, text: String) -> Result<bool, BackendError>;

    /// `Ok(false)` when no prompt has that id.
    async fn delete_prompt(&self, id: String) -> Result<bool, BackendError>;
}

/// Normalize a search query: blank means "no filter".
pub fn query_param(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}
