use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use iced::keyboard::{self, key::Named, Key};
use iced::task;
use iced::widget::{self, operation, scrollable, text_editor};
use iced::{event, window, Color, Element, Event, Point, Subscription, Task, Theme};

use crate::backend::PromptBackend;
use crate::clipboard;
use crate::config::HudConfig;
use crate::ipc;
use crate::session::{Action, Effect, Focus, HudKey, Session};
use crate::theme::{self, ThemeColors, ThemeMode};
use crate::timer::TimerKind;
use crate::visibility::HudMode;

pub(crate) const SEARCH_ID: &str = "search";
pub(crate) const EDITOR_ID: &str = "editor";
pub(crate) const LIST_ID: &str = "prompt-list";

pub(crate) struct Hud {
    pub(crate) session: Session,
    backend: Arc<dyn PromptBackend>,
    window: Option<window::Id>,
    pub(crate) editor_content: text_editor::Content,
    /// One abortable sleep per timer kind; replacing a handle aborts the old sleep.
    timers: [Option<task::Handle>; 4],
    cursor: Point,
    theme_mode: ThemeMode,
    pub(crate) colors: ThemeColors,
    event_socket: PathBuf,
}

#[derive(Debug, Clone)]
pub(crate) enum Message {
    Session(Action),
    WindowOpened(window::Id),
    WindowClosed(window::Id),
    PointerMoved(Point),
    IdlePressed,
    IdleReleased,
    EditorAction(text_editor::Action),
    ThemeDetected(bool),
}

pub(crate) fn run(config: HudConfig, backend: Arc<dyn PromptBackend>) -> iced::Result {
    tracing::info!(
        "v{} ({}) starting",
        env!("PROMPTMAXX_HUD_VERSION"),
        env!("PROMPTMAXX_HUD_COMMIT"),
    );

    iced::daemon(
        move || Hud::new(config.clone(), backend.clone()),
        Hud::update,
        Hud::view,
    )
    .title(Hud::title)
    .theme(Hud::theme)
    .style(Hud::style)
    .subscription(Hud::subscription)
    .run()
}

impl Hud {
    fn new(config: HudConfig, backend: Arc<dyn PromptBackend>) -> (Self, Task<Message>) {
        let (session, effects) = Session::new(&config.hotkey_label);
        let (id, open) = window::open(window::Settings {
            size: HudMode::Collapsed.window_size(),
            position: window::Position::Centered,
            resizable: false,
            decorations: false,
            transparent: true,
            level: window::Level::AlwaysOnTop,
            ..Default::default()
        });
        tracing::info!("booting -> Collapsed (window {id:?})");

        let mut hud = Self {
            session,
            backend,
            window: Some(id),
            editor_content: text_editor::Content::new(),
            timers: Default::default(),
            cursor: Point::ORIGIN,
            theme_mode: config.theme,
            colors: theme::resolve(config.theme),
            event_socket: config.event_socket,
        };
        let boot = hud.run_effects(effects);
        (hud, Task::batch([open.map(Message::WindowOpened), boot]))
    }

    fn title(&self, _window: window::Id) -> String {
        String::from("promptmaxx")
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Session(action) => self.dispatch(action),
            Message::WindowOpened(id) => {
                tracing::debug!("window {id:?} opened");
                Task::none()
            }
            Message::WindowClosed(id) => {
                if self.window == Some(id) {
                    tracing::info!("window closed, exiting");
                    self.window = None;
                    return iced::exit();
                }
                Task::none()
            }
            Message::PointerMoved(position) => {
                self.cursor = position;
                self.dispatch(Action::PointerMoved(position))
            }
            Message::IdlePressed => self.dispatch(Action::IdlePressed {
                at: Instant::now(),
                position: self.cursor,
            }),
            Message::IdleReleased => self.dispatch(Action::IdleReleased {
                at: Instant::now(),
                position: self.cursor,
            }),
            Message::EditorAction(action) => {
                let editor = self.session.editor();
                if !editor.is_open() || (action.is_edit() && editor.is_saving()) {
                    return Task::none();
                }
                let is_edit = action.is_edit();
                self.editor_content.perform(action);
                if is_edit {
                    let text = self.editor_content.text();
                    self.dispatch(Action::EditorInput(text))
                } else {
                    Task::none()
                }
            }
            Message::ThemeDetected(dark) => {
                if self.theme_mode == ThemeMode::Auto && dark != self.colors.is_dark {
                    self.colors = if dark { ThemeColors::dark() } else { ThemeColors::light() };
                    tracing::info!("auto theme -> {}", if dark { "dark" } else { "light" });
                }
                Task::none()
            }
        }
    }

    fn dispatch(&mut self, action: Action) -> Task<Message> {
        let effects = self.session.update(action);
        self.run_effects(effects)
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Task<Message> {
        let tasks: Vec<_> = effects.into_iter().map(|e| self.run_effect(e)).collect();
        Task::batch(tasks)
    }

    fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        let backend = Arc::clone(&self.backend);
        match effect {
            Effect::LoadPrompts { query } => Task::perform(
                async move { backend.get_prompts(query).await },
                |result| Message::Session(Action::PromptsLoaded(result)),
            ),
            Effect::RefreshCount => Task::perform(
                async move { backend.get_prompt_count().await },
                |result| Message::Session(Action::CountLoaded(result)),
            ),
            Effect::CreatePrompt { session, text } => {
                let sent = text.clone();
                Task::perform(
                    async move { backend.create_prompt(sent).await },
                    move |result| Message::Session(Action::Created { session, text, result }),
                )
            }
            Effect::UpdatePrompt { session, id, text } => {
                let sent = text.clone();
                Task::perform(
                    async move { backend.update_prompt(id, sent).await },
                    move |result| Message::Session(Action::Updated { session, text, result }),
                )
            }
            Effect::DeletePrompt { id } => {
                let sent = id.clone();
                Task::perform(
                    async move { backend.delete_prompt(sent).await },
                    move |result| Message::Session(Action::Deleted { id, result }),
                )
            }
            Effect::SetWindowSize { expanded } => {
                let mode = if expanded { HudMode::Expanded } else { HudMode::Collapsed };
                match self.window {
                    Some(id) => window::resize(id, mode.window_size()),
                    None => Task::none(),
                }
            }
            Effect::StartDrag => match self.window {
                Some(id) => window::drag(id),
                None => Task::none(),
            },
            Effect::OpenEditor { text } => {
                self.editor_content = text_editor::Content::with_text(&text);
                self.editor_content
                    .perform(text_editor::Action::Move(text_editor::Motion::DocumentEnd));
                operation::focus(widget::Id::new(EDITOR_ID))
            }
            Effect::Focus(Focus::Search) => {
                operation::focus(widget::Id::new(focus_target(Focus::Search)))
            }
            Effect::Focus(focus @ Focus::Card(index)) => {
                let y = card_offset(index, self.session.list().len());
                Task::batch([
                    operation::focus(widget::Id::new(focus_target(focus))),
                    operation::snap_to(
                        widget::Id::new(LIST_ID),
                        scrollable::RelativeOffset { x: 0.0, y },
                    ),
                ])
            }
            Effect::CopyText { text, preview } => Task::perform(
                clipboard::copy_text(text),
                move |result| Message::Session(Action::Copied { preview, result }),
            ),
            Effect::Schedule { kind, token } => self.schedule(kind, token),
            Effect::Cancel(kind) => {
                self.timers[kind.index()] = None;
                Task::none()
            }
        }
    }

    fn schedule(&mut self, kind: TimerKind, token: u64) -> Task<Message> {
        let (sleep, handle) = Task::perform(tokio::time::sleep(kind.delay()), move |()| {
            Message::Session(Action::TimerFired { kind, token })
        })
        .abortable();
        self.timers[kind.index()] = Some(handle.abort_on_drop());
        sleep
    }

    fn view(&self, _window: window::Id) -> Element<'_, Message> {
        self.view_hud()
    }

    fn subscription(state: &Self) -> Subscription<Message> {
        let mut subs = vec![
            Subscription::run_with(state.event_socket.clone(), ipc::event_listener),
            event::listen_with(keyboard_message),
            window::close_events().map(Message::WindowClosed),
        ];
        if state.theme_mode == ThemeMode::Auto {
            subs.push(Subscription::run(ipc::theme_refresh_stream));
        }
        Subscription::batch(subs)
    }

    fn theme(&self, _window: window::Id) -> Theme {
        if self.colors.is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn style(&self, _theme: &Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: Color::TRANSPARENT,
            text_color: self.colors.text,
        }
    }
}

fn keyboard_message(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    let Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) = event else {
        return None;
    };
    route_key(&key, status == event::Status::Captured).map(|key| Message::Session(Action::Key(key)))
}

/// Widget id a focus request moves keyboard focus to. The list is not
/// focusable, so focusing it blurs the search field and card keys
/// (Space, Delete, Backspace) reach the session uncaptured.
fn focus_target(focus: Focus) -> &'static str {
    match focus {
        Focus::Search => SEARCH_ID,
        Focus::Card(_) => LIST_ID,
    }
}

/// Relative scroll offset that brings card `index` of `len` into view.
fn card_offset(index: usize, len: usize) -> f32 {
    if len > 1 {
        index.min(len - 1) as f32 / (len - 1) as f32
    } else {
        0.0
    }
}

/// Escape always reaches the session; the other keys only when no widget
/// (search field, editor) consumed them.
fn route_key(key: &Key, captured: bool) -> Option<HudKey> {
    let key = match key.as_ref() {
        Key::Named(Named::Escape) => return Some(HudKey::Escape),
        Key::Named(Named::ArrowUp) => HudKey::Up,
        Key::Named(Named::ArrowDown) => HudKey::Down,
        Key::Named(Named::Enter) => HudKey::Enter,
        Key::Named(Named::Space) => HudKey::Space,
        Key::Named(Named::Delete) => HudKey::Delete,
        Key::Named(Named::Backspace) => HudKey::Backspace,
        _ => return None,
    };
    (!captured).then_some(key)
}
