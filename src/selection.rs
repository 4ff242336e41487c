use crate::prompts::PromptList;
use crate::timer::TimerSlot;

/// Result of a delete press on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeletePress {
    /// The card is now armed; `token` identifies its countdown.
    Armed { token: u64, disarmed: Option<String> },
    /// Second press on the armed card: go ahead and delete.
    Confirmed(String),
}

/// Keyboard selection plus the single delete-confirmation slot.
#[derive(Debug, Default)]
pub(crate) struct Selection {
    selected: Option<usize>,
    armed: Option<String>,
    confirm: TimerSlot,
}

impl Selection {
    pub(crate) fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[cfg(test)]
    pub(crate) fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    pub(crate) fn is_armed(&self, id: &str) -> bool {
        self.armed.as_deref() == Some(id)
    }

    /// Down arrow. Clamped at the last card, no wraparound.
    pub(crate) fn move_down(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            self.selected = None;
            return None;
        }
        let next = match self.selected {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        };
        self.selected = Some(next);
        self.selected
    }

    /// Up arrow. Clamped at the first card; from nothing, picks the last.
    pub(crate) fn move_up(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            self.selected = None;
            return None;
        }
        let next = match self.selected {
            None => len - 1,
            Some(i) => i.saturating_sub(1).min(len - 1),
        };
        self.selected = Some(next);
        self.selected
    }

    /// Point the selection at a card the pointer interacted with.
    pub(crate) fn select(&mut self, index: usize, len: usize) {
        if index < len {
            self.selected = Some(index);
        }
    }

    pub(crate) fn press_delete(&mut self, id: &str) -> DeletePress {
        if self.is_armed(id) {
            self.armed = None;
            self.confirm.cancel();
            return DeletePress::Confirmed(id.to_string());
        }
        let disarmed = self.armed.replace(id.to_string());
        let token = self.confirm.arm();
        DeletePress::Armed { token, disarmed }
    }

    /// Countdown elapsed. Returns the id that was disarmed, if the token
    /// still belongs to the armed card.
    pub(crate) fn expire(&mut self, token: u64) -> Option<String> {
        if self.confirm.fire(token) {
            self.armed.take()
        } else {
            None
        }
    }

    /// Called after a reload replaced the list: selection goes back to
    /// nothing and a confirmation on a vanished prompt is dropped.
    /// Returns true if the armed prompt was disarmed.
    pub(crate) fn reconcile(&mut self, list: &PromptList) -> bool {
        self.selected = None;
        match &self.armed {
            Some(id) if !list.contains(id) => {
                self.armed = None;
                self.confirm.cancel();
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn confirm_pending(&self) -> bool {
        self.confirm.is_pending()
    }
}
