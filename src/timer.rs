use std::time::Duration;

/// Quiet period after the last keystroke before a search load is issued.
pub(crate) const SEARCH_DEBOUNCE: Duration = Duration::from_millis(150);
/// Window in which a second delete press confirms the first.
pub(crate) const DELETE_CONFIRM: Duration = Duration::from_millis(2000);
/// How long a toast stays on screen.
pub(crate) const TOAST_DISMISS: Duration = Duration::from_millis(2500);
/// Length of the highlight on a card after it was copied.
pub(crate) const COPY_PULSE: Duration = Duration::from_millis(300);

/// The single-shot timers the HUD owns. At most one of each kind is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TimerKind {
    SearchDebounce,
    DeleteConfirm,
    ToastDismiss,
    CopyPulse,
}

impl TimerKind {
    #[cfg(test)]
    pub(crate) const ALL: [TimerKind; 4] = [
        TimerKind::SearchDebounce,
        TimerKind::DeleteConfirm,
        TimerKind::ToastDismiss,
        TimerKind::CopyPulse,
    ];

    pub(crate) fn delay(self) -> Duration {
        match self {
            TimerKind::SearchDebounce => SEARCH_DEBOUNCE,
            TimerKind::DeleteConfirm => DELETE_CONFIRM,
            TimerKind::ToastDismiss => TOAST_DISMISS,
            TimerKind::CopyPulse => COPY_PULSE,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            TimerKind::SearchDebounce => 0,
            TimerKind::DeleteConfirm => 1,
            TimerKind::ToastDismiss => 2,
            TimerKind::CopyPulse => 3,
        }
    }
}

/// One timer slot. Arming hands out a fresh token and invalidates the
/// previous one, so a late firing of a replaced timer is ignored.
#[derive(Debug, Default, Clone)]
pub(crate) struct TimerSlot {
    generation: u64,
    pending: Option<u64>,
}

impl TimerSlot {
    pub(crate) fn arm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(self.generation);
        self.generation
    }

    /// Returns true if a timer was pending.
    pub(crate) fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Consume a firing. Only the most recently armed token counts.
    pub(crate) fn fire(&mut self, token: u64) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
