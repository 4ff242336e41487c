use serde::{Deserialize, Serialize};

/// A saved prompt, as owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub text: String,
    pub repo: Option<String>,
    pub branch: Option<String>,
    /// RFC 3339 creation instant.
    pub timestamp: String,
}

/// Outcome of a save the backend performed on its own (hotkey capture).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
    pub message: String,
    pub prompt_preview: String,
    pub is_duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadState {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    /// The last load failed; cached prompts are kept but hidden behind a
    /// retry placeholder.
    Failed(String),
}

/// Read-through cache of the last successful `get_prompts` result.
#[derive(Debug)]
pub(crate) struct PromptList {
    prompts: Vec<Prompt>,
    state: LoadState,
    in_flight: usize,
}

impl Default for PromptList {
    fn default() -> Self {
        Self {
            prompts: Vec::new(),
            state: LoadState::Idle,
            in_flight: 0,
        }
    }
}

impl PromptList {
    /// Record that a load was issued. Earlier loads keep running.
    pub(crate) fn begin_load(&mut self) {
        self.in_flight += 1;
        self.state = LoadState::Loading;
    }

    /// Replace the cache wholesale with a resolved response.
    pub(crate) fn resolve(&mut self, prompts: Vec<Prompt>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.prompts = prompts;
        self.state = LoadState::Ready;
    }

    /// A load failed: keep the cached data, show the error placeholder.
    pub(crate) fn fail(&mut self, message: String) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state = LoadState::Failed(message);
    }

    pub(crate) fn state(&self) -> &LoadState {
        &self.state
    }

    /// A load is outstanding over cached cards, which stay visible under a
    /// loading line.
    pub(crate) fn is_refreshing(&self) -> bool {
        self.state == LoadState::Loading && !self.prompts.is_empty()
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(crate) fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub(crate) fn len(&self) -> usize {
        self.prompts.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Prompt> {
        self.prompts.get(index)
    }

    pub(crate) fn find(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.prompts.iter().position(|p| p.id == id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

#[cfg(test)]
pub(crate) fn sample(id: &str, text: &str) -> Prompt {
    Prompt {
        id: id.to_string(),
        text: text.to_string(),
        repo: Some("promptmaxx".to_string()),
        branch: Some("main".to_string()),
        timestamp: "2025-03-10T12:00:00+00:00".to_string(),
    }
}
