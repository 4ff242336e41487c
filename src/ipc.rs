use std::io::BufRead;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::time::Duration;

use futures::channel::mpsc;

use crate::app::Message;
use crate::events::PushEvent;
use crate::session::Action;
use crate::theme;

const THEME_REFRESH: Duration = Duration::from_secs(5);

/// Bind the push-event socket and forward every parsed event line.
/// A stale socket file from a previous run is replaced.
pub(crate) fn event_listener(path: &PathBuf) -> mpsc::UnboundedReceiver<Message> {
    let path = path.clone();
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || {
        let _ = std::fs::remove_file(&path);
        let listener = match UnixListener::bind(&path) {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("failed to bind event socket {path:?}: {e}");
                return;
            }
        };
        tracing::info!("listening for events on {path:?}");
        for stream in listener.incoming().flatten() {
            let open = read_events(std::io::BufReader::new(stream), |event| {
                tx.unbounded_send(Message::Session(Action::Push(event))).is_ok()
            });
            if !open {
                break;
            }
        }
        let _ = std::fs::remove_file(&path);
    });
    rx
}

/// Parse one event per line until EOF. Bad lines are logged and skipped.
/// Returns false once `emit` reports the receiver is gone.
fn read_events(reader: impl BufRead, mut emit: impl FnMut(PushEvent) -> bool) -> bool {
    for line in reader.lines().map_while(Result::ok) {
        if line.trim().is_empty() {
            continue;
        }
        match PushEvent::parse_line(&line) {
            Ok(event) => {
                tracing::debug!("event: {}", event.name());
                if !emit(event) {
                    return false;
                }
            }
            Err(e) => tracing::warn!("ignoring event line: {e}"),
        }
    }
    true
}

/// Re-probe the desktop color scheme; used only in auto theme mode.
pub(crate) fn theme_refresh_stream() -> impl futures::Stream<Item = Message> {
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(THEME_REFRESH);
            if tx
                .unbounded_send(Message::ThemeDetected(theme::detect_system_dark()))
                .is_err()
            {
                break;
            }
        }
    });
    rx
}
