use std::process::Stdio;
use std::sync::{Mutex, OnceLock};

use arboard::Clipboard;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::ClipboardError;

/// Kept alive for the whole process: on X11 the selection is served by
/// its owner, so dropping the handle would empty the clipboard.
static PRIMARY: OnceLock<Mutex<Option<Clipboard>>> = OnceLock::new();

/// Put `text` on the system clipboard, falling back to the desktop's CLI
/// tool when the native clipboard is unavailable.
pub(crate) async fn copy_text(text: String) -> Result<(), ClipboardError> {
    let owned = text.clone();
    let primary = tokio::task::spawn_blocking(move || write_primary(&owned))
        .await
        .map_err(|e| ClipboardError::Primary(e.to_string()))
        .and_then(|result| result);

    match primary {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::debug!("{err}; trying fallback");
            let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
            write_fallback(fallback_command(wayland), &text).await
        }
    }
}

fn write_primary(text: &str) -> Result<(), ClipboardError> {
    let cell = PRIMARY.get_or_init(|| Mutex::new(None));
    let mut guard = cell
        .lock()
        .map_err(|_| ClipboardError::Primary("clipboard handle poisoned".to_string()))?;
    if guard.is_none() {
        let clipboard = Clipboard::new().map_err(|e| ClipboardError::Primary(e.to_string()))?;
        *guard = Some(clipboard);
    }
    let Some(clipboard) = guard.as_mut() else {
        return Err(ClipboardError::Primary("no clipboard handle".to_string()));
    };
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| ClipboardError::Primary(e.to_string()))
}

/// Program and arguments that read the new clipboard content from stdin.
fn fallback_command(wayland: bool) -> (&'static str, &'static [&'static str]) {
    if wayland {
        ("wl-copy", &[])
    } else {
        ("xclip", &["-selection", "clipboard"])
    }
}

async fn write_fallback(
    (program, args): (&'static str, &'static [&'static str]),
    text: &str,
) -> Result<(), ClipboardError> {
    let fail = |reason: String| ClipboardError::Fallback { program, reason };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| fail(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|e| fail(e.to_string()))?;
        // EOF tells the tool the content is complete.
        drop(stdin);
    }

    let status = child.wait().await.map_err(|e| fail(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(fail(format!("exited with {status}")))
    }
}
