use crate::timer::TimerSlot;
use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Duplicate,
    Error,
}

impl ToastKind {
    pub(crate) fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "\u{2713}",
            ToastKind::Duplicate => "\u{25cf}",
            ToastKind::Error => "\u{2715}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ToastMessage {
    pub(crate) kind: ToastKind,
    pub(crate) title: String,
    /// Already cut to the display length; empty means no preview line.
    pub(crate) preview: String,
}

/// Single-slot notification. A new toast replaces the visible one and
/// restarts the dismiss countdown.
#[derive(Debug, Default)]
pub(crate) struct Toast {
    current: Option<ToastMessage>,
    timer: TimerSlot,
}

impl Toast {
    /// Show a toast and return the dismiss-timer token.
    pub(crate) fn show(&mut self, kind: ToastKind, title: &str, preview: &str) -> u64 {
        self.current = Some(ToastMessage {
            kind,
            title: title.to_string(),
            preview: util::toast_preview(preview),
        });
        self.timer.arm()
    }

    /// Dismiss if `token` belongs to the toast on screen.
    pub(crate) fn expire(&mut self, token: u64) -> bool {
        if self.timer.fire(token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn current(&self) -> Option<&ToastMessage> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_expire() {
        let mut toast = Toast::default();
        let token = toast.show(ToastKind::Success, "Saved", "hello");
        assert_eq!(toast.current().map(|t| t.title.as_str()), Some("Saved"));
        assert!(toast.expire(token));
        assert!(toast.current().is_none());
    }

    #[test]
    fn later_toast_preempts_and_survives_old_timer() {
        let mut toast = Toast::default();
        let first = toast.show(ToastKind::Success, "Copied to clipboard", "abc");
        let second = toast.show(ToastKind::Error, "Delete failed", "");
        // The first countdown fires late: it must not hide the second toast.
        assert!(!toast.expire(first));
        let shown = toast.current().expect("second toast visible");
        assert_eq!(shown.kind, ToastKind::Error);
        assert_eq!(shown.title, "Delete failed");
        assert!(toast.expire(second));
    }

    #[test]
    fn preview_is_cut_for_display() {
        let mut toast = Toast::default();
        toast.show(ToastKind::Duplicate, "Already saved", &"x".repeat(70));
        let shown = toast.current().unwrap();
        assert_eq!(shown.preview.chars().count(), 53);
        assert!(shown.preview.ends_with("..."));
    }

    #[test]
    fn icons_differ_per_kind() {
        assert_ne!(ToastKind::Success.icon(), ToastKind::Error.icon());
        assert_ne!(ToastKind::Success.icon(), ToastKind::Duplicate.icon());
    }
}
