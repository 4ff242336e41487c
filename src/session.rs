use std::time::Instant;

use iced::Point;

use crate::backend::query_param;
use crate::editor::{Editor, Rejected, Submission};
use crate::error::{BackendError, ClipboardError};
use crate::events::PushEvent;
use crate::prompts::{Prompt, PromptList};
use crate::selection::{DeletePress, Selection};
use crate::timer::{TimerKind, TimerSlot};
use crate::toast::{Toast, ToastKind};
use crate::util::{self, COPY_PREVIEW_CHARS};
use crate::visibility::{Gesture, HudMode, TapTracker};

pub(crate) const DEFAULT_HOTKEY: &str = "Cmd+Shift+P";

/// Keys the HUD reacts to outside of text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HudKey {
    Escape,
    Up,
    Down,
    Enter,
    Space,
    Delete,
    Backspace,
}

/// Everything that can change the session: user input, backend replies,
/// timer firings and push-events.
#[derive(Debug, Clone)]
pub(crate) enum Action {
    IdlePressed { at: Instant, position: Point },
    PointerMoved(Point),
    IdleReleased { at: Instant, position: Point },
    HeaderPressed,
    Collapse,
    Key(HudKey),
    SearchChanged(String),
    RetryLoad,
    CardClicked(String),
    DeletePressed(String),
    AddPressed,
    EditPressed(String),
    EditorInput(String),
    EditorSave,
    EditorCancel,
    PromptsLoaded(Result<Vec<Prompt>, BackendError>),
    CountLoaded(Result<u64, BackendError>),
    Created {
        session: u64,
        text: String,
        result: Result<bool, BackendError>,
    },
    Updated {
        session: u64,
        text: String,
        result: Result<bool, BackendError>,
    },
    Deleted {
        id: String,
        result: Result<bool, BackendError>,
    },
    Copied {
        preview: String,
        result: Result<(), ClipboardError>,
    },
    TimerFired { kind: TimerKind, token: u64 },
    Push(PushEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Search,
    Card(usize),
}

/// Work the shell performs on behalf of the session. The session never
/// talks to the backend, the clipboard or the window itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    LoadPrompts { query: Option<String> },
    RefreshCount,
    CreatePrompt { session: u64, text: String },
    UpdatePrompt { session: u64, id: String, text: String },
    DeletePrompt { id: String },
    SetWindowSize { expanded: bool },
    StartDrag,
    /// Reset the editor surface to `text` with the caret at the end.
    OpenEditor { text: String },
    Focus(Focus),
    CopyText { text: String, preview: String },
    /// Arm the timer of `kind`, replacing any pending one.
    Schedule { kind: TimerKind, token: u64 },
    Cancel(TimerKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Status {
    Ready,
    Saving,
    Error(String),
}

impl Status {
    pub(crate) fn label(&self) -> &str {
        match self {
            Status::Ready => "ready",
            Status::Saving => "saving",
            Status::Error(msg) => msg,
        }
    }
}

/// Footer count: unknown until the first reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Count {
    Unknown,
    Known(u64),
    Failed(String),
}

/// The whole HUD interaction state. One instance per process, owned by the
/// shell and mutated only through [`Session::update`].
#[derive(Debug)]
pub(crate) struct Session {
    mode: HudMode,
    gesture: TapTracker,
    query: String,
    search_timer: TimerSlot,
    list: PromptList,
    count: Count,
    selection: Selection,
    editor: Editor,
    toast: Toast,
    pulse: Option<String>,
    pulse_timer: TimerSlot,
    hotkey: String,
    status: Status,
    mutations_in_flight: usize,
}

impl Session {
    pub(crate) fn new(hotkey: &str) -> (Self, Vec<Effect>) {
        let session = Self {
            mode: HudMode::Collapsed,
            gesture: TapTracker::default(),
            query: String::new(),
            search_timer: TimerSlot::default(),
            list: PromptList::default(),
            count: Count::Unknown,
            selection: Selection::default(),
            editor: Editor::default(),
            toast: Toast::default(),
            pulse: None,
            pulse_timer: TimerSlot::default(),
            hotkey: hotkey.to_string(),
            status: Status::Ready,
            mutations_in_flight: 0,
        };
        (session, vec![Effect::RefreshCount])
    }

    // --- read access for the views ---

    pub(crate) fn mode(&self) -> HudMode {
        self.mode
    }

    pub(crate) fn is_expanded(&self) -> bool {
        self.mode == HudMode::Expanded
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn list(&self) -> &PromptList {
        &self.list
    }

    pub(crate) fn count(&self) -> &Count {
        &self.count
    }

    pub(crate) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn editor(&self) -> &Editor {
        &self.editor
    }

    pub(crate) fn toast(&self) -> &Toast {
        &self.toast
    }

    pub(crate) fn is_pulsing(&self, id: &str) -> bool {
        self.pulse.as_deref() == Some(id)
    }

    pub(crate) fn hotkey(&self) -> &str {
        &self.hotkey
    }

    /// Saving wins over the last reported status while a mutation runs.
    pub(crate) fn status(&self) -> Status {
        if self.mutations_in_flight > 0 {
            Status::Saving
        } else {
            self.status.clone()
        }
    }

    // --- reducer ---

    pub(crate) fn update(&mut self, action: Action) -> Vec<Effect> {
        let mut fx = Vec::new();
        match action {
            Action::IdlePressed { at, position } => {
                if self.mode == HudMode::Collapsed {
                    self.gesture.press(at, position);
                    fx.push(Effect::StartDrag);
                }
            }
            Action::PointerMoved(position) => self.gesture.track(position),
            Action::IdleReleased { at, position } => {
                if self.mode == HudMode::Collapsed {
                    match self.gesture.release(at, position) {
                        Gesture::Tap => self.expand(&mut fx),
                        Gesture::Drag => tracing::debug!("idle panel dragged"),
                    }
                }
            }
            Action::HeaderPressed => {
                if self.is_expanded() {
                    fx.push(Effect::StartDrag);
                }
            }
            Action::Collapse => self.collapse(&mut fx),
            Action::Key(key) => self.on_key(key, &mut fx),
            // Unchanged text (a key the field swallowed) must not reload
            // and drop the selection.
            Action::SearchChanged(text) => {
                if text != self.query {
                    self.query = text;
                    let token = self.search_timer.arm();
                    fx.push(Effect::Schedule {
                        kind: TimerKind::SearchDebounce,
                        token,
                    });
                }
            }
            Action::RetryLoad => self.load(&mut fx),
            Action::CardClicked(id) => {
                if let Some(index) = self.list.position(&id) {
                    self.selection.select(index, self.list.len());
                    self.copy(index, &mut fx);
                }
            }
            Action::DeletePressed(id) => self.press_delete(&id, &mut fx),
            Action::AddPressed => {
                self.editor.open_create();
                fx.push(Effect::OpenEditor {
                    text: String::new(),
                });
            }
            Action::EditPressed(id) => {
                if let Some(prompt) = self.list.find(&id) {
                    let text = prompt.text.clone();
                    self.editor.open_edit(&id, &text);
                    fx.push(Effect::OpenEditor { text });
                }
            }
            Action::EditorInput(text) => self.editor.set_draft(text),
            Action::EditorSave => self.save_editor(&mut fx),
            Action::EditorCancel => {
                if self.editor.cancel() {
                    fx.push(Effect::Focus(Focus::Search));
                }
            }
            Action::PromptsLoaded(Ok(prompts)) => {
                tracing::debug!("loaded {} prompt(s)", prompts.len());
                self.list.resolve(prompts);
                if self.selection.reconcile(&self.list) {
                    fx.push(Effect::Cancel(TimerKind::DeleteConfirm));
                }
                if self.pulse.as_deref().is_some_and(|id| !self.list.contains(id)) {
                    self.pulse = None;
                    self.pulse_timer.cancel();
                    fx.push(Effect::Cancel(TimerKind::CopyPulse));
                }
            }
            Action::PromptsLoaded(Err(err)) => {
                tracing::warn!("load failed: {err}");
                self.list.fail(err.to_string());
            }
            Action::CountLoaded(Ok(count)) => self.count = Count::Known(count),
            Action::CountLoaded(Err(err)) => {
                tracing::warn!("count failed: {err}");
                self.count = Count::Failed(err.to_string());
            }
            Action::Created {
                session,
                text,
                result,
            } => {
                self.end_mutation();
                match result {
                    Ok(true) => {
                        self.editor.finish(session);
                        self.show_toast(ToastKind::Success, "Saved", &text, &mut fx);
                        self.resync(&mut fx);
                    }
                    Ok(false) => {
                        self.editor.finish(session);
                        self.show_toast(ToastKind::Duplicate, "Already exists", &text, &mut fx);
                        self.load(&mut fx);
                    }
                    Err(err) => {
                        tracing::warn!("create failed: {err}");
                        let msg = err.to_string();
                        self.editor.fail(session, &msg);
                        self.show_toast(ToastKind::Error, "Save failed", &msg, &mut fx);
                    }
                }
            }
            Action::Updated {
                session,
                text,
                result,
            } => {
                self.end_mutation();
                match result {
                    Ok(true) => {
                        self.editor.finish(session);
                        self.show_toast(ToastKind::Success, "Updated", &text, &mut fx);
                        self.resync(&mut fx);
                    }
                    Ok(false) => {
                        self.editor.finish(session);
                        self.show_toast(ToastKind::Duplicate, "Prompt no longer exists", "", &mut fx);
                        self.resync(&mut fx);
                    }
                    Err(err) => {
                        tracing::warn!("update failed: {err}");
                        let msg = err.to_string();
                        self.editor.fail(session, &msg);
                        self.show_toast(ToastKind::Error, "Update failed", &msg, &mut fx);
                    }
                }
            }
            Action::Deleted { id, result } => {
                self.end_mutation();
                match result {
                    Ok(true) => {
                        tracing::info!("deleted prompt {id}");
                        self.show_toast(ToastKind::Success, "Deleted", "", &mut fx);
                        self.resync(&mut fx);
                    }
                    Ok(false) => {
                        // Someone else removed it; the cache is stale.
                        self.show_toast(ToastKind::Duplicate, "Already deleted", "", &mut fx);
                        self.resync(&mut fx);
                    }
                    Err(err) => {
                        tracing::warn!("delete of {id} failed: {err}");
                        self.show_toast(ToastKind::Error, "Delete failed", &err.to_string(), &mut fx);
                    }
                }
            }
            Action::Copied { preview, result } => match result {
                Ok(()) => self.show_toast(ToastKind::Success, "Copied to clipboard", &preview, &mut fx),
                Err(err) => {
                    tracing::warn!("copy failed: {err}");
                    self.show_toast(ToastKind::Error, "Copy failed", &err.to_string(), &mut fx);
                }
            },
            Action::TimerFired { kind, token } => self.on_timer(kind, token, &mut fx),
            Action::Push(event) => self.on_push(event, &mut fx),
        }
        fx
    }

    fn on_key(&mut self, key: HudKey, fx: &mut Vec<Effect>) {
        if key == HudKey::Escape {
            if self.editor.cancel() {
                fx.push(Effect::Focus(Focus::Search));
            } else {
                self.collapse(fx);
            }
            return;
        }
        if !self.is_expanded() || self.editor.is_open() {
            return;
        }
        let len = self.list.len();
        match key {
            HudKey::Down => {
                if let Some(i) = self.selection.move_down(len) {
                    fx.push(Effect::Focus(Focus::Card(i)));
                }
            }
            HudKey::Up => {
                if let Some(i) = self.selection.move_up(len) {
                    fx.push(Effect::Focus(Focus::Card(i)));
                }
            }
            HudKey::Enter | HudKey::Space => {
                if let Some(i) = self.selection.selected() {
                    self.copy(i, fx);
                }
            }
            HudKey::Delete | HudKey::Backspace => {
                if let Some(id) = self
                    .selection
                    .selected()
                    .and_then(|i| self.list.get(i))
                    .map(|p| p.id.clone())
                {
                    self.press_delete(&id, fx);
                }
            }
            HudKey::Escape => {}
        }
    }

    fn on_timer(&mut self, kind: TimerKind, token: u64, fx: &mut Vec<Effect>) {
        match kind {
            TimerKind::SearchDebounce => {
                if self.search_timer.fire(token) {
                    self.load(fx);
                }
            }
            TimerKind::DeleteConfirm => {
                if let Some(id) = self.selection.expire(token) {
                    tracing::debug!("delete confirmation for {id} expired");
                }
            }
            TimerKind::ToastDismiss => {
                self.toast.expire(token);
            }
            TimerKind::CopyPulse => {
                if self.pulse_timer.fire(token) {
                    self.pulse = None;
                }
            }
        }
    }

    fn on_push(&mut self, event: PushEvent, fx: &mut Vec<Effect>) {
        tracing::debug!("push event: {}", event.name());
        match event {
            PushEvent::PromptSaved(result) => {
                self.status = Status::Ready;
                if result.is_duplicate {
                    self.show_toast(ToastKind::Duplicate, "Already saved", &result.prompt_preview, fx);
                } else if result.success {
                    self.show_toast(ToastKind::Success, "Saved", &result.prompt_preview, fx);
                    if self.is_expanded() {
                        self.load(fx);
                    }
                    fx.push(Effect::RefreshCount);
                } else {
                    self.show_toast(ToastKind::Error, &result.message, &result.prompt_preview, fx);
                }
            }
            PushEvent::PromptError(message) => {
                self.status = Status::Ready;
                self.show_toast(ToastKind::Error, "Error", &message, fx);
            }
            PushEvent::HotkeyRegistered(label) => {
                tracing::info!("hotkey registered: {label}");
                self.hotkey = label;
                self.status = Status::Ready;
            }
            PushEvent::HotkeyError(message) => {
                tracing::warn!("hotkey error: {message}");
                self.status = Status::Error("hotkey failed".to_string());
                self.show_toast(ToastKind::Error, "Hotkey failed", &message, fx);
            }
            PushEvent::ToggleHud => match self.mode {
                HudMode::Collapsed => self.expand(fx),
                HudMode::Expanded => self.collapse(fx),
            },
        }
    }

    fn expand(&mut self, fx: &mut Vec<Effect>) {
        if self.is_expanded() {
            return;
        }
        self.mode = HudMode::Expanded;
        tracing::info!("Collapsed -> Expanded");
        self.query.clear();
        if self.search_timer.cancel() {
            fx.push(Effect::Cancel(TimerKind::SearchDebounce));
        }
        fx.push(Effect::SetWindowSize { expanded: true });
        fx.push(Effect::Focus(Focus::Search));
        self.resync(fx);
    }

    fn collapse(&mut self, fx: &mut Vec<Effect>) {
        if !self.is_expanded() {
            return;
        }
        self.mode = HudMode::Collapsed;
        tracing::info!("Expanded -> Collapsed");
        fx.push(Effect::SetWindowSize { expanded: false });
    }

    fn load(&mut self, fx: &mut Vec<Effect>) {
        self.list.begin_load();
        fx.push(Effect::LoadPrompts {
            query: query_param(&self.query),
        });
    }

    /// Reload the filtered list and the unfiltered count.
    fn resync(&mut self, fx: &mut Vec<Effect>) {
        self.load(fx);
        fx.push(Effect::RefreshCount);
    }

    fn copy(&mut self, index: usize, fx: &mut Vec<Effect>) {
        let Some(prompt) = self.list.get(index) else {
            return;
        };
        let text = prompt.text.clone();
        self.pulse = Some(prompt.id.clone());
        let token = self.pulse_timer.arm();
        fx.push(Effect::Schedule {
            kind: TimerKind::CopyPulse,
            token,
        });
        fx.push(Effect::CopyText {
            preview: util::head_chars(&text, COPY_PREVIEW_CHARS),
            text,
        });
    }

    fn press_delete(&mut self, id: &str, fx: &mut Vec<Effect>) {
        if !self.list.contains(id) {
            return;
        }
        match self.selection.press_delete(id) {
            DeletePress::Armed { token, disarmed } => {
                if let Some(previous) = disarmed {
                    tracing::debug!("disarmed {previous}");
                }
                fx.push(Effect::Schedule {
                    kind: TimerKind::DeleteConfirm,
                    token,
                });
            }
            DeletePress::Confirmed(id) => {
                fx.push(Effect::Cancel(TimerKind::DeleteConfirm));
                self.mutations_in_flight += 1;
                fx.push(Effect::DeletePrompt { id });
            }
        }
    }

    fn save_editor(&mut self, fx: &mut Vec<Effect>) {
        let session = self.editor.session();
        match self.editor.submit() {
            Ok(Submission::Create { text }) => {
                self.mutations_in_flight += 1;
                fx.push(Effect::CreatePrompt { session, text });
            }
            Ok(Submission::Update { id, text }) => {
                self.mutations_in_flight += 1;
                fx.push(Effect::UpdatePrompt { session, id, text });
            }
            Err(Rejected::Empty) => tracing::debug!("empty editor submission rejected"),
            Err(Rejected::Busy | Rejected::Closed) => {}
        }
    }

    fn end_mutation(&mut self) {
        self.mutations_in_flight = self.mutations_in_flight.saturating_sub(1);
    }

    fn show_toast(&mut self, kind: ToastKind, title: &str, preview: &str, fx: &mut Vec<Effect>) {
        let token = self.toast.show(kind, title, preview);
        fx.push(Effect::Schedule {
            kind: TimerKind::ToastDismiss,
            token,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::editor::EditorMode;
    use crate::prompts::{LoadState, SaveResult, sample};

    fn boot() -> Session {
        Session::new(DEFAULT_HOTKEY).0
    }

    fn expanded_with(ids: &[&str]) -> Session {
        let mut s = boot();
        s.update(Action::Push(PushEvent::ToggleHud));
        s.update(Action::PromptsLoaded(Ok(prompts(ids))));
        s
    }

    fn prompts(ids: &[&str]) -> Vec<Prompt> {
        ids.iter().map(|id| sample(id, &format!("text of {id}"))).collect()
    }

    fn scheduled(fx: &[Effect], kind: TimerKind) -> Option<u64> {
        fx.iter().find_map(|e| match e {
            Effect::Schedule { kind: k, token } if *k == kind => Some(*token),
            _ => None,
        })
    }

    fn count_of(fx: &[Effect], pred: impl Fn(&Effect) -> bool) -> usize {
        fx.iter().filter(|e| pred(e)).count()
    }

    fn is_load(e: &Effect) -> bool {
        matches!(e, Effect::LoadPrompts { .. })
    }

    fn is_backend_call(e: &Effect) -> bool {
        matches!(
            e,
            Effect::LoadPrompts { .. }
                | Effect::RefreshCount
                | Effect::CreatePrompt { .. }
                | Effect::UpdatePrompt { .. }
                | Effect::DeletePrompt { .. }
        )
    }

    fn assert_invariants(s: &Session) {
        if let Some(i) = s.selection().selected() {
            assert!(i < s.list().len(), "selected index {i} out of range");
        }
        if let Some(id) = s.selection().armed() {
            assert!(s.list().contains(id), "armed prompt {id} not in list");
        }
    }

    // -----------------------------------------------------------------------
    // boot / visibility
    // -----------------------------------------------------------------------

    #[test]
    fn boot_is_collapsed_and_refreshes_count() {
        let (s, fx) = Session::new("Ctrl+Alt+P");
        assert_eq!(s.mode(), HudMode::Collapsed);
        assert_eq!(s.hotkey(), "Ctrl+Alt+P");
        assert_eq!(fx, vec![Effect::RefreshCount]);
    }

    #[test]
    fn quick_tap_expands_with_resize_focus_and_load() {
        let mut s = boot();
        let t0 = Instant::now();
        let fx = s.update(Action::IdlePressed {
            at: t0,
            position: Point::new(10.0, 10.0),
        });
        assert_eq!(fx, vec![Effect::StartDrag]);
        let fx = s.update(Action::IdleReleased {
            at: t0 + Duration::from_millis(50),
            position: Point::new(12.0, 12.0),
        });
        assert!(s.is_expanded());
        assert_eq!(
            fx,
            vec![
                Effect::SetWindowSize { expanded: true },
                Effect::Focus(Focus::Search),
                Effect::LoadPrompts { query: None },
                Effect::RefreshCount,
            ]
        );
        assert_eq!(s.list().state(), &LoadState::Loading);
    }

    #[test]
    fn slow_press_stays_collapsed() {
        let mut s = boot();
        let t0 = Instant::now();
        s.update(Action::IdlePressed {
            at: t0,
            position: Point::new(10.0, 10.0),
        });
        let fx = s.update(Action::IdleReleased {
            at: t0 + Duration::from_millis(300),
            position: Point::new(12.0, 12.0),
        });
        assert!(fx.is_empty());
        assert_eq!(s.mode(), HudMode::Collapsed);
    }

    #[test]
    fn idle_press_ignored_when_expanded() {
        let mut s = expanded_with(&[]);
        let fx = s.update(Action::IdlePressed {
            at: Instant::now(),
            position: Point::ORIGIN,
        });
        assert!(fx.is_empty());
    }

    #[test]
    fn header_drags_only_when_expanded() {
        let mut s = boot();
        assert!(s.update(Action::HeaderPressed).is_empty());
        s.update(Action::Push(PushEvent::ToggleHud));
        assert_eq!(s.update(Action::HeaderPressed), vec![Effect::StartDrag]);
        assert_eq!(s.update(Action::HeaderPressed), vec![Effect::StartDrag]);
    }

    #[test]
    fn close_and_escape_collapse() {
        let mut s = expanded_with(&["a"]);
        assert_eq!(
            s.update(Action::Collapse),
            vec![Effect::SetWindowSize { expanded: false }]
        );
        assert!(!s.is_expanded());
        assert!(s.update(Action::Collapse).is_empty());

        let mut s = expanded_with(&["a"]);
        assert_eq!(
            s.update(Action::Key(HudKey::Escape)),
            vec![Effect::SetWindowSize { expanded: false }]
        );
    }

    #[test]
    fn toggle_event_flips_both_ways() {
        let mut s = boot();
        s.update(Action::Push(PushEvent::ToggleHud));
        assert!(s.is_expanded());
        let fx = s.update(Action::Push(PushEvent::ToggleHud));
        assert!(!s.is_expanded());
        assert_eq!(fx, vec![Effect::SetWindowSize { expanded: false }]);
    }

    #[test]
    fn expanding_clears_query_and_pending_search() {
        let mut s = expanded_with(&[]);
        s.update(Action::SearchChanged("abc".to_string()));
        s.update(Action::Collapse);
        let fx = s.update(Action::Push(PushEvent::ToggleHud));
        assert_eq!(s.query(), "");
        assert!(fx.contains(&Effect::Cancel(TimerKind::SearchDebounce)));
        assert!(fx.contains(&Effect::LoadPrompts { query: None }));
    }

    // -----------------------------------------------------------------------
    // loading
    // -----------------------------------------------------------------------

    #[test]
    fn three_prompts_and_count_label() {
        let mut s = expanded_with(&["p1", "p2", "p3"]);
        s.update(Action::CountLoaded(Ok(3)));
        assert_eq!(s.list().len(), 3);
        assert_eq!(s.count(), &Count::Known(3));
        assert_eq!(util::count_label(3), "3 prompts saved");
    }

    #[test]
    fn last_resolved_response_wins() {
        let mut s = expanded_with(&[]);
        s.update(Action::SearchChanged("a".to_string()));
        s.update(Action::RetryLoad);
        s.update(Action::SearchChanged("ab".to_string()));
        s.update(Action::RetryLoad);
        // Second request resolves first, first request resolves last.
        s.update(Action::PromptsLoaded(Ok(prompts(&["ab-hit"]))));
        s.update(Action::PromptsLoaded(Ok(prompts(&["a-hit", "a-hit-2"]))));
        let ids: Vec<&str> = s.list().prompts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a-hit", "a-hit-2"]);
    }

    #[test]
    fn reload_resets_selection() {
        let mut s = expanded_with(&["a", "b", "c"]);
        s.update(Action::Key(HudKey::Down));
        s.update(Action::Key(HudKey::Down));
        assert_eq!(s.selection().selected(), Some(1));
        s.update(Action::PromptsLoaded(Ok(prompts(&["a"]))));
        assert_eq!(s.selection().selected(), None);
        assert_invariants(&s);
    }

    #[test]
    fn load_failure_keeps_cache_and_offers_retry() {
        let mut s = expanded_with(&["a", "b"]);
        s.update(Action::RetryLoad);
        s.update(Action::PromptsLoaded(Err(BackendError::io("get_prompts", "boom"))));
        assert_eq!(s.list().len(), 2);
        assert!(matches!(s.list().state(), LoadState::Failed(msg) if msg.contains("boom")));
        let fx = s.update(Action::RetryLoad);
        assert_eq!(fx, vec![Effect::LoadPrompts { query: None }]);
    }

    #[test]
    fn count_failure_is_visible() {
        let mut s = boot();
        s.update(Action::CountLoaded(Err(BackendError::io("get_prompt_count", "down"))));
        assert!(matches!(s.count(), Count::Failed(_)));
    }

    // -----------------------------------------------------------------------
    // search debounce
    // -----------------------------------------------------------------------

    #[test]
    fn search_loads_only_after_quiet_period() {
        let mut s = expanded_with(&[]);
        let first = scheduled(
            &s.update(Action::SearchChanged("f".to_string())),
            TimerKind::SearchDebounce,
        )
        .unwrap();
        let second = scheduled(
            &s.update(Action::SearchChanged("fi".to_string())),
            TimerKind::SearchDebounce,
        )
        .unwrap();
        assert!(s.update(Action::TimerFired {
            kind: TimerKind::SearchDebounce,
            token: first
        })
        .is_empty());
        let fx = s.update(Action::TimerFired {
            kind: TimerKind::SearchDebounce,
            token: second,
        });
        assert_eq!(
            fx,
            vec![Effect::LoadPrompts {
                query: Some("fi".to_string())
            }]
        );
    }

    #[test]
    fn unchanged_search_text_keeps_selection() {
        let mut s = expanded_with(&["a", "b"]);
        s.update(Action::Key(HudKey::Down));
        assert!(s.update(Action::SearchChanged(String::new())).is_empty());
        assert_eq!(s.selection().selected(), Some(0));

        let fx = s.update(Action::Key(HudKey::Backspace));
        assert!(s.selection().is_armed("a"));
        assert!(scheduled(&fx, TimerKind::DeleteConfirm).is_some());
    }

    #[test]
    fn clearing_search_loads_unfiltered() {
        let mut s = expanded_with(&[]);
        let token = scheduled(
            &s.update(Action::SearchChanged("   ".to_string())),
            TimerKind::SearchDebounce,
        )
        .unwrap();
        let fx = s.update(Action::TimerFired {
            kind: TimerKind::SearchDebounce,
            token,
        });
        assert_eq!(fx, vec![Effect::LoadPrompts { query: None }]);
    }

    // -----------------------------------------------------------------------
    // delete confirmation
    // -----------------------------------------------------------------------

    #[test]
    fn delete_twice_within_window_deletes_once() {
        let mut s = expanded_with(&["p1", "p2"]);
        let fx = s.update(Action::DeletePressed("p1".to_string()));
        assert!(scheduled(&fx, TimerKind::DeleteConfirm).is_some());
        assert!(s.selection().is_armed("p1"));
        assert_eq!(count_of(&fx, is_backend_call), 0);

        let fx = s.update(Action::DeletePressed("p1".to_string()));
        assert_eq!(
            fx,
            vec![
                Effect::Cancel(TimerKind::DeleteConfirm),
                Effect::DeletePrompt {
                    id: "p1".to_string()
                },
            ]
        );
        assert_eq!(s.status(), Status::Saving);

        let fx = s.update(Action::Deleted {
            id: "p1".to_string(),
            result: Ok(true),
        });
        assert_eq!(count_of(&fx, is_load), 1);
        assert_eq!(count_of(&fx, |e| *e == Effect::RefreshCount), 1);
        assert_eq!(s.toast().current().map(|t| t.title.as_str()), Some("Deleted"));
        assert_eq!(s.status(), Status::Ready);

        s.update(Action::PromptsLoaded(Ok(prompts(&["p2"]))));
        assert_eq!(s.list().len(), 1);
        assert_invariants(&s);
    }

    #[test]
    fn delete_countdown_expiry_reverts_without_backend_call() {
        let mut s = expanded_with(&["p1"]);
        let token = scheduled(
            &s.update(Action::DeletePressed("p1".to_string())),
            TimerKind::DeleteConfirm,
        )
        .unwrap();
        let fx = s.update(Action::TimerFired {
            kind: TimerKind::DeleteConfirm,
            token,
        });
        assert!(fx.is_empty());
        assert_eq!(s.selection().armed(), None);
        // Next press arms again instead of deleting.
        let fx = s.update(Action::DeletePressed("p1".to_string()));
        assert_eq!(count_of(&fx, is_backend_call), 0);
    }

    #[test]
    fn arming_b_after_a_leaves_only_b() {
        let mut s = expanded_with(&["a", "b"]);
        let token_a = scheduled(
            &s.update(Action::DeletePressed("a".to_string())),
            TimerKind::DeleteConfirm,
        )
        .unwrap();
        s.update(Action::DeletePressed("b".to_string()));
        assert_eq!(s.selection().armed(), Some("b"));
        s.update(Action::TimerFired {
            kind: TimerKind::DeleteConfirm,
            token: token_a,
        });
        assert_eq!(s.selection().armed(), Some("b"));
    }

    #[test]
    fn reload_without_armed_prompt_disarms() {
        let mut s = expanded_with(&["a", "b"]);
        s.update(Action::DeletePressed("a".to_string()));
        let fx = s.update(Action::PromptsLoaded(Ok(prompts(&["b"]))));
        assert_eq!(fx, vec![Effect::Cancel(TimerKind::DeleteConfirm)]);
        assert_eq!(s.selection().armed(), None);
        assert_invariants(&s);
    }

    #[test]
    fn delete_unknown_id_ignored() {
        let mut s = expanded_with(&["a"]);
        assert!(s.update(Action::DeletePressed("zzz".to_string())).is_empty());
        assert_eq!(s.selection().armed(), None);
    }

    #[test]
    fn delete_failure_toasts_and_keeps_cache() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::DeletePressed("a".to_string()));
        s.update(Action::DeletePressed("a".to_string()));
        let fx = s.update(Action::Deleted {
            id: "a".to_string(),
            result: Err(BackendError::io("delete_prompt", "locked")),
        });
        assert_eq!(count_of(&fx, is_backend_call), 0);
        assert_eq!(s.list().len(), 1);
        let toast = s.toast().current().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.title, "Delete failed");
    }

    #[test]
    fn delete_not_found_resyncs() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::DeletePressed("a".to_string()));
        s.update(Action::DeletePressed("a".to_string()));
        let fx = s.update(Action::Deleted {
            id: "a".to_string(),
            result: Ok(false),
        });
        assert_eq!(count_of(&fx, is_load), 1);
        assert_eq!(s.toast().current().unwrap().kind, ToastKind::Duplicate);
    }

    #[test]
    fn opening_editor_keeps_delete_countdown() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::DeletePressed("a".to_string()));
        let fx = s.update(Action::AddPressed);
        assert!(!fx.iter().any(|e| matches!(e, Effect::Cancel(_))));
        assert!(s.selection().is_armed("a"));
        assert!(s.editor().is_open());
    }

    // -----------------------------------------------------------------------
    // keyboard
    // -----------------------------------------------------------------------

    #[test]
    fn arrows_move_selection_and_focus() {
        let mut s = expanded_with(&["a", "b"]);
        assert_eq!(
            s.update(Action::Key(HudKey::Down)),
            vec![Effect::Focus(Focus::Card(0))]
        );
        s.update(Action::Key(HudKey::Down));
        assert_eq!(
            s.update(Action::Key(HudKey::Down)),
            vec![Effect::Focus(Focus::Card(1))]
        );
        assert_eq!(
            s.update(Action::Key(HudKey::Up)),
            vec![Effect::Focus(Focus::Card(0))]
        );
        assert_invariants(&s);
    }

    #[test]
    fn arrows_ignored_while_collapsed_or_editing() {
        let mut s = boot();
        assert!(s.update(Action::Key(HudKey::Down)).is_empty());
        let mut s = expanded_with(&["a"]);
        s.update(Action::AddPressed);
        assert!(s.update(Action::Key(HudKey::Down)).is_empty());
    }

    #[test]
    fn enter_copies_selected_card() {
        let mut s = expanded_with(&["a", "b"]);
        s.update(Action::Key(HudKey::Down));
        let fx = s.update(Action::Key(HudKey::Enter));
        assert!(fx.contains(&Effect::CopyText {
            text: "text of a".to_string(),
            preview: "text of a".to_string(),
        }));
        assert!(s.is_pulsing("a"));
    }

    #[test]
    fn enter_without_selection_does_nothing() {
        let mut s = expanded_with(&["a"]);
        assert!(s.update(Action::Key(HudKey::Space)).is_empty());
    }

    #[test]
    fn backspace_arms_then_confirms_selected() {
        let mut s = expanded_with(&["a", "b"]);
        s.update(Action::Key(HudKey::Down));
        s.update(Action::Key(HudKey::Down));
        s.update(Action::Key(HudKey::Backspace));
        assert!(s.selection().is_armed("b"));
        let fx = s.update(Action::Key(HudKey::Delete));
        assert!(fx.contains(&Effect::DeletePrompt {
            id: "b".to_string()
        }));
    }

    // -----------------------------------------------------------------------
    // copy
    // -----------------------------------------------------------------------

    #[test]
    fn click_copies_with_forty_char_preview_and_pulse() {
        let mut s = boot();
        s.update(Action::Push(PushEvent::ToggleHud));
        let long = "x".repeat(90);
        s.update(Action::PromptsLoaded(Ok(vec![sample("a", &long)])));
        let fx = s.update(Action::CardClicked("a".to_string()));
        let pulse = scheduled(&fx, TimerKind::CopyPulse).unwrap();
        let preview = fx
            .iter()
            .find_map(|e| match e {
                Effect::CopyText { preview, text } => {
                    assert_eq!(text.len(), 90);
                    Some(preview.clone())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(preview.chars().count(), 40);
        assert_eq!(s.selection().selected(), Some(0));

        s.update(Action::Copied {
            preview: preview.clone(),
            result: Ok(()),
        });
        let toast = s.toast().current().unwrap();
        assert_eq!(toast.title, "Copied to clipboard");
        assert_eq!(toast.preview, preview);

        s.update(Action::TimerFired {
            kind: TimerKind::CopyPulse,
            token: pulse,
        });
        assert!(!s.is_pulsing("a"));
    }

    #[test]
    fn copy_failure_is_reported() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::CardClicked("a".to_string()));
        s.update(Action::Copied {
            preview: "text of a".to_string(),
            result: Err(ClipboardError::Fallback {
                program: "wl-copy",
                reason: "not found".to_string(),
            }),
        });
        assert_eq!(s.toast().current().unwrap().kind, ToastKind::Error);
    }

    // -----------------------------------------------------------------------
    // editor
    // -----------------------------------------------------------------------

    #[test]
    fn empty_save_makes_no_backend_call() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::AddPressed);
        s.update(Action::EditorInput("   ".to_string()));
        let fx = s.update(Action::EditorSave);
        assert!(fx.is_empty());
        assert!(s.editor().is_open());
        assert!(s.editor().error().is_some());
    }

    #[test]
    fn edit_opens_prefilled() {
        let mut s = expanded_with(&["a"]);
        let fx = s.update(Action::EditPressed("a".to_string()));
        assert_eq!(
            fx,
            vec![Effect::OpenEditor {
                text: "text of a".to_string()
            }]
        );
        assert_eq!(s.editor().mode(), &EditorMode::Editing("a".to_string()));
    }

    #[test]
    fn duplicate_create_closes_editor_and_reloads() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::AddPressed);
        s.update(Action::EditorInput("x".to_string()));
        let fx = s.update(Action::EditorSave);
        let session = match &fx[..] {
            [Effect::CreatePrompt { session, text }] => {
                assert_eq!(text, "x");
                *session
            }
            other => panic!("unexpected {other:?}"),
        };
        let fx = s.update(Action::Created {
            session,
            text: "x".to_string(),
            result: Ok(false),
        });
        let toast = s.toast().current().unwrap();
        assert_eq!(toast.title, "Already exists");
        assert_eq!(toast.kind, ToastKind::Duplicate);
        assert!(!s.editor().is_open());
        assert_eq!(count_of(&fx, is_load), 1);
    }

    #[test]
    fn successful_update_resyncs() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::EditPressed("a".to_string()));
        s.update(Action::EditorInput(" changed ".to_string()));
        let fx = s.update(Action::EditorSave);
        let session = s.editor().session();
        assert_eq!(
            fx,
            vec![Effect::UpdatePrompt {
                session,
                id: "a".to_string(),
                text: "changed".to_string()
            }]
        );
        let fx = s.update(Action::Updated {
            session,
            text: "changed".to_string(),
            result: Ok(true),
        });
        assert!(!s.editor().is_open());
        assert_eq!(count_of(&fx, is_load), 1);
        assert_eq!(count_of(&fx, |e| *e == Effect::RefreshCount), 1);
    }

    #[test]
    fn failed_create_keeps_editor_open() {
        let mut s = expanded_with(&[]);
        s.update(Action::AddPressed);
        s.update(Action::EditorInput("keep".to_string()));
        s.update(Action::EditorSave);
        let session = s.editor().session();
        let fx = s.update(Action::Created {
            session,
            text: "keep".to_string(),
            result: Err(BackendError::io("create_prompt", "disk full")),
        });
        assert_eq!(count_of(&fx, is_backend_call), 0);
        assert!(s.editor().is_open());
        assert_eq!(s.editor().draft(), "keep");
        assert_eq!(s.toast().current().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn stale_reply_does_not_close_newer_editor() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::AddPressed);
        s.update(Action::EditorInput("first".to_string()));
        s.update(Action::EditorSave);
        let old = s.editor().session();
        s.update(Action::EditPressed("a".to_string()));
        s.update(Action::Created {
            session: old,
            text: "first".to_string(),
            result: Ok(true),
        });
        assert!(s.editor().is_editing("a"));
    }

    #[test]
    fn escape_cancels_editor_before_collapsing() {
        let mut s = expanded_with(&["a"]);
        s.update(Action::AddPressed);
        let fx = s.update(Action::Key(HudKey::Escape));
        assert_eq!(fx, vec![Effect::Focus(Focus::Search)]);
        assert!(!s.editor().is_open());
        assert!(s.is_expanded());
        let fx = s.update(Action::EditorCancel);
        assert!(fx.is_empty());
    }

    // -----------------------------------------------------------------------
    // push events
    // -----------------------------------------------------------------------

    fn saved(success: bool, duplicate: bool) -> PushEvent {
        PushEvent::PromptSaved(SaveResult {
            success,
            message: if duplicate { "Already saved" } else { "Saved" }.to_string(),
            prompt_preview: "captured prompt".to_string(),
            is_duplicate: duplicate,
        })
    }

    #[test]
    fn saved_event_reloads_when_expanded() {
        let mut s = expanded_with(&[]);
        let fx = s.update(Action::Push(saved(true, false)));
        assert_eq!(count_of(&fx, is_load), 1);
        assert!(fx.contains(&Effect::RefreshCount));
        assert_eq!(s.toast().current().unwrap().title, "Saved");
    }

    #[test]
    fn saved_event_only_refreshes_count_when_collapsed() {
        let mut s = boot();
        let fx = s.update(Action::Push(saved(true, false)));
        assert_eq!(count_of(&fx, is_load), 0);
        assert!(fx.contains(&Effect::RefreshCount));
    }

    #[test]
    fn duplicate_saved_event_toasts_only() {
        let mut s = expanded_with(&[]);
        let fx = s.update(Action::Push(saved(false, true)));
        assert_eq!(count_of(&fx, is_backend_call), 0);
        let toast = s.toast().current().unwrap();
        assert_eq!(toast.title, "Already saved");
        assert_eq!(toast.kind, ToastKind::Duplicate);
    }

    #[test]
    fn hotkey_events_update_label_and_status() {
        let mut s = boot();
        s.update(Action::Push(PushEvent::HotkeyError("in use".to_string())));
        assert_eq!(s.status(), Status::Error("hotkey failed".to_string()));
        assert_eq!(s.toast().current().unwrap().kind, ToastKind::Error);
        s.update(Action::Push(PushEvent::HotkeyRegistered("Ctrl+Shift+P".to_string())));
        assert_eq!(s.hotkey(), "Ctrl+Shift+P");
        assert_eq!(s.status(), Status::Ready);
    }

    #[test]
    fn prompt_error_event_keeps_data() {
        let mut s = expanded_with(&["a"]);
        let fx = s.update(Action::Push(PushEvent::PromptError("No prompt found".to_string())));
        assert_eq!(count_of(&fx, is_backend_call), 0);
        assert_eq!(s.list().len(), 1);
        assert_eq!(s.toast().current().unwrap().preview, "No prompt found");
    }

    #[test]
    fn stale_toast_timer_does_not_hide_newer_toast() {
        let mut s = expanded_with(&["a"]);
        let first = scheduled(
            &s.update(Action::Push(PushEvent::PromptError("one".to_string()))),
            TimerKind::ToastDismiss,
        )
        .unwrap();
        s.update(Action::Push(PushEvent::PromptError("two".to_string())));
        s.update(Action::TimerFired {
            kind: TimerKind::ToastDismiss,
            token: first,
        });
        assert_eq!(s.toast().current().unwrap().preview, "two");
    }
}
