use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use super::PromptBackend;
use crate::error::BackendError;
use crate::prompts::Prompt;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// One request line sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    GetPrompts { query: Option<String> },
    GetPromptCount,
    CreatePrompt { text: String },
    UpdatePrompt { id: String, text: String },
    DeletePrompt { id: String },
}

impl Request {
    pub fn command(&self) -> &'static str {
        match self {
            Request::GetPrompts { .. } => "get_prompts",
            Request::GetPromptCount => "get_prompt_count",
            Request::CreatePrompt { .. } => "create_prompt",
            Request::UpdatePrompt { .. } => "update_prompt",
            Request::DeletePrompt { .. } => "delete_prompt",
        }
    }
}

/// One reply line: `{"ok": <value>}` or `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Ok { ok: T },
    Err { error: String },
}

/// Talks to the prompt store over a Unix socket, one connection per call,
/// newline-delimited JSON in both directions.
#[derive(Debug, Clone)]
pub struct SocketBackend {
    path: PathBuf,
}

impl SocketBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn call<T: DeserializeOwned>(&self, request: Request) -> Result<T, BackendError> {
        let command = request.command();
        let line = tokio::time::timeout(REQUEST_TIMEOUT, self.exchange(&request))
            .await
            .map_err(|_| BackendError::io(command, "timed out"))??;
        decode_reply(command, &line)
    }

    async fn exchange(&self, request: &Request) -> Result<String, BackendError> {
        let command = request.command();
        let stream = UnixStream::connect(&self.path)
            .await
            .map_err(|e| BackendError::Connect {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        let (read_half, mut write_half) = stream.into_split();

        let mut line = serde_json::to_string(request)
            .map_err(|e| BackendError::protocol(command, e.to_string()))?;
        line.push('\n');
        write_half
            .write_all(line.as_bytes())
            .await
            .map_err(|e| BackendError::io(command, e))?;
        write_half
            .flush()
            .await
            .map_err(|e| BackendError::io(command, e))?;

        let mut reply = String::new();
        BufReader::new(read_half)
            .read_line(&mut reply)
            .await
            .map_err(|e| BackendError::io(command, e))?;
        Ok(reply)
    }
}

fn decode_reply<T: DeserializeOwned>(command: &'static str, line: &str) -> Result<T, BackendError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(BackendError::protocol(command, "connection closed without a reply"));
    }
    match serde_json::from_str::<Reply<T>>(line) {
        Ok(Reply::Ok { ok }) => Ok(ok),
        Ok(Reply::Err { error }) => Err(BackendError::Remote {
            command,
            message: error,
        }),
        Err(e) => Err(BackendError::protocol(command, e.to_string())),
    }
}

#[async_trait]
impl PromptBackend for SocketBackend {
    async fn get_prompts(&self, query: Option<String>) -> Result<Vec<Prompt>, BackendError> {
        self.call(Request::GetPrompts { query }).await
    }

    async fn get_prompt_count(&self) -> Result<u64, BackendError> {
        self.call(Request::GetPromptCount).await
    }

    async fn create_prompt(&self, text: String) -> Result<bool, BackendError> {
        self.call(Request::CreatePrompt { text }).await
    }

    async fn update_prompt(&self, id: String, text: String) -> Result<bool, BackendError> {
        self.call(Request::UpdatePrompt { id, text }).await
    }

    async fn delete_prompt(&self, id: String) -> Result<bool, BackendError> {
        self.call(Request::DeletePrompt { id }).await
    }
}
