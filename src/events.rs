use crate::error::EventParseError;
use crate::prompts::SaveResult;

/// Events the backend pushes to the HUD, one per line on the event socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// The backend saved a prompt on its own (hotkey capture).
    PromptSaved(SaveResult),
    /// The backend failed to capture or save a prompt.
    PromptError(String),
    /// Global shortcut is active; payload is its display label.
    HotkeyRegistered(String),
    HotkeyError(String),
    /// Flip collapsed/expanded (tray click, ctl command).
    ToggleHud,
}

impl PushEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PushEvent::PromptSaved(_) => "prompt-saved",
            PushEvent::PromptError(_) => "prompt-error",
            PushEvent::HotkeyRegistered(_) => "hotkey-registered",
            PushEvent::HotkeyError(_) => "hotkey-error",
            PushEvent::ToggleHud => "toggle-hud",
        }
    }

    /// Parse one line: `<event-name>[ <payload>]`.
    ///
    /// `prompt-saved` carries a JSON `SaveResult`; the string events carry
    /// the rest of the line verbatim; `toggle-hud` has no payload.
    pub fn parse_line(line: &str) -> Result<Self, EventParseError> {
        let line = line.trim();
        let (name, payload) = match line.split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let required = |event: &'static str| -> Result<String, EventParseError> {
            if payload.is_empty() {
                Err(EventParseError::MissingPayload { event })
            } else {
                Ok(payload.to_string())
            }
        };

        match name {
            "toggle-hud" | "toggle" => Ok(PushEvent::ToggleHud),
            "prompt-saved" => {
                let raw = required("prompt-saved")?;
                serde_json::from_str(&raw)
                    .map(PushEvent::PromptSaved)
                    .map_err(|e| EventParseError::BadPayload {
                        event: "prompt-saved",
                        reason: e.to_string(),
                    })
            }
            "prompt-error" => required("prompt-error").map(PushEvent::PromptError),
            "hotkey-registered" => required("hotkey-registered").map(PushEvent::HotkeyRegistered),
            "hotkey-error" => required("hotkey-error").map(PushEvent::HotkeyError),
            other => Err(EventParseError::Unknown(other.to_string())),
        }
    }

    /// Inverse of [`PushEvent::parse_line`], without the trailing newline.
    #[cfg(test)]
    pub fn to_line(&self) -> String {
        match self {
            PushEvent::ToggleHud => self.name().to_string(),
            PushEvent::PromptSaved(result) => {
                // SaveResult has only plain fields; serialization cannot fail.
                let json = serde_json::to_string(result).unwrap_or_default();
                format!("{} {json}", self.name())
            }
            PushEvent::PromptError(msg)
            | PushEvent::HotkeyRegistered(msg)
            | PushEvent::HotkeyError(msg) => {
                format!("{} {}", self.name(), msg.replace('\n', " "))
            }
        }
    }
}
