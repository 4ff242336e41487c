use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// Send an event to a running promptmaxx-hud.
#[derive(Parser, Debug)]
#[command(name = "promptmaxx-hud-ctl", version)]
struct Cli {
    /// HUD event socket (default: $PROMPTMAXX_HUD_SOCKET or $XDG_RUNTIME_DIR/promptmaxx-hud.sock)
    #[arg(long, value_name = "PATH")]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand the HUD, or collapse it when expanded
    Toggle,
    /// Report a prompt captured by the hotkey
    Saved {
        /// Text shown under the toast title
        preview: String,
        /// The prompt already existed
        #[arg(long)]
        duplicate: bool,
        /// The save failed; the message becomes the toast title
        #[arg(long, value_name = "MESSAGE")]
        failed: Option<String>,
    },
    /// Report a capture failure
    Error { message: String },
    /// Announce the active global shortcut
    HotkeyRegistered { label: String },
    /// Report that the global shortcut could not be registered
    HotkeyError { message: String },
}

fn socket_path() -> PathBuf {
    if let Some(path) = std::env::var_os("PROMPTMAXX_HUD_SOCKET").filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("promptmaxx-hud.sock")
}

/// One event line as the HUD parses it, without the trailing newline.
fn event_line(command: &Command) -> String {
    let flat = |s: &str| s.replace('\n', " ");
    match command {
        Command::Toggle => "toggle-hud".to_string(),
        Command::Saved {
            preview,
            duplicate,
            failed,
        } => {
            let message = match (failed, duplicate) {
                (Some(message), _) => message.as_str(),
                (None, true) => "Already saved",
                (None, false) => "Saved",
            };
            let payload = serde_json::json!({
                "success": failed.is_none() && !duplicate,
                "message": message,
                "prompt_preview": preview,
                "is_duplicate": duplicate,
            });
            format!("prompt-saved {payload}")
        }
        Command::Error { message } => format!("prompt-error {}", flat(message)),
        Command::HotkeyRegistered { label } => format!("hotkey-registered {}", flat(label)),
        Command::HotkeyError { message } => format!("hotkey-error {}", flat(message)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli.socket.unwrap_or_else(socket_path);
    let line = event_line(&cli.command);

    let mut stream = UnixStream::connect(&path)
        .with_context(|| format!("promptmaxx-hud not running ({path:?})"))?;
    writeln!(stream, "{line}").context("failed to send event")?;
    Ok(())
}
