use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::PromptBackend;
use crate::error::BackendError;
use crate::prompts::Prompt;

/// Most prompts a single `get_prompts` returns.
const LIST_LIMIT: usize = 100;

/// In-process prompt store. Backs `--demo` and the tests.
///
/// Prompts are kept newest first; duplicates are detected by exact text;
/// search is a case-insensitive substring match.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    prompts: Mutex<Vec<Prompt>>,
}

impl MemoryBackend {
    /// Seed with prompts given newest first.
    pub fn with_prompts(prompts: Vec<Prompt>) -> Self {
        Self {
            prompts: Mutex::new(prompts),
        }
    }

    fn lock(
        &self,
        command: &'static str,
    ) -> Result<std::sync::MutexGuard<'_, Vec<Prompt>>, BackendError> {
        self.prompts.lock().map_err(|_| BackendError::Remote {
            command,
            message: "prompt store poisoned".to_string(),
        })
    }
}

#[async_trait]
impl PromptBackend for MemoryBackend {
    async fn get_prompts(&self, query: Option<String>) -> Result<Vec<Prompt>, BackendError> {
        let prompts = self.lock("get_prompts")?;
        let needle = query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        Ok(prompts
            .iter()
            .filter(|p| match &needle {
                Some(n) => p.text.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .take(LIST_LIMIT)
            .cloned()
            .collect())
    }

    async fn get_prompt_count(&self) -> Result<u64, BackendError> {
        Ok(self.lock("get_prompt_count")?.len() as u64)
    }

    async fn create_prompt(&self, text: String) -> Result<bool, BackendError> {
        let mut prompts = self.lock("create_prompt")?;
        if prompts.iter().any(|p| p.text == text) {
            return Ok(false);
        }
        prompts.insert(
            0,
            Prompt {
                id: Uuid::new_v4().to_string(),
                text,
                repo: None,
                branch: None,
                timestamp: Utc::now().to_rfc3339(),
            },
        );
        Ok(true)
    }

    async fn update_prompt(&self, id: String, text: String) -> Result<bool, BackendError> {
        let mut prompts = self.lock("update_prompt")?;
        match prompts.iter_mut().find(|p| p.id == id) {
            Some(prompt) => {
                prompt.text = text;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_prompt(&self, id: String) -> Result<bool, BackendError> {
        let mut prompts = self.lock("delete_prompt")?;
        let before = prompts.len();
        prompts.retain(|p| p.id != id);
        Ok(prompts.len() < before)
    }
}
