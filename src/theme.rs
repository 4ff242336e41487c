use iced::widget::{button, container, text_editor, text_input};
use iced::{Background, Border, Color, Shadow, Theme, Vector};
use serde::Deserialize;

use crate::toast::ToastKind;

/// How the theme is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
    /// Follow the desktop color scheme (re-checked periodically).
    Auto,
}

/// All colors and font sizes used throughout the HUD, derived from the active theme.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub is_dark: bool,
    // Text
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub duplicate: Color,
    pub error: Color,
    // Backgrounds
    pub panel_bg: Color,
    pub card_bg: Color,
    pub selected: Color,
    pub armed: Color,
    pub pulse: Color,
    pub input_bg: Color,
    pub border: Color,
    // Font sizes (logical pixels)
    pub title_text: f32,
    /// Card body, search field, editor
    pub body_text: f32,
    /// Repo/branch/age line, footer
    pub meta_text: f32,
}

const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
    Color { r, g, b, a }
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            text: rgba(1.0, 1.0, 1.0, 0.9),
            muted: rgba(1.0, 1.0, 1.0, 0.45),
            accent: rgba(0.35, 0.85, 0.55, 1.0),
            duplicate: rgba(1.0, 0.78, 0.0, 1.0),
            error: rgba(0.95, 0.3, 0.3, 1.0),
            panel_bg: rgba(0.06, 0.06, 0.09, 0.94),
            card_bg: rgba(0.11, 0.11, 0.16, 0.8),
            selected: rgba(0.18, 0.18, 0.27, 0.95),
            armed: rgba(0.45, 0.08, 0.08, 0.85),
            pulse: rgba(0.2, 0.45, 0.3, 0.95),
            input_bg: rgba(0.09, 0.09, 0.13, 1.0),
            border: rgba(1.0, 1.0, 1.0, 0.12),
            title_text: 14.0,
            body_text: 13.0,
            meta_text: 10.5,
        }
    }

    pub fn light() -> Self {
        Self {
            is_dark: false,
            text: rgba(0.08, 0.08, 0.08, 0.92),
            muted: rgba(0.35, 0.35, 0.35, 0.8),
            accent: rgba(0.1, 0.55, 0.3, 1.0),
            duplicate: rgba(0.65, 0.42, 0.0, 1.0),
            error: rgba(0.75, 0.1, 0.1, 1.0),
            panel_bg: rgba(0.96, 0.96, 0.97, 0.96),
            card_bg: rgba(1.0, 1.0, 1.0, 0.9),
            selected: rgba(0.82, 0.84, 0.95, 1.0),
            armed: rgba(0.98, 0.82, 0.82, 1.0),
            pulse: rgba(0.8, 0.94, 0.85, 1.0),
            input_bg: rgba(1.0, 1.0, 1.0, 1.0),
            border: rgba(0.0, 0.0, 0.0, 0.12),
            title_text: 14.0,
            body_text: 13.0,
            meta_text: 10.5,
        }
    }

    pub fn toast_color(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.accent,
            ToastKind::Duplicate => self.duplicate,
            ToastKind::Error => self.error,
        }
    }

    pub fn panel_style(&self) -> impl Fn(&Theme) -> container::Style {
        let (bg, border) = (self.panel_bg, self.border);
        move |_theme: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border {
                color: border,
                width: 1.0,
                radius: 12.0.into(),
            },
            shadow: Shadow {
                color: rgba(0.0, 0.0, 0.0, 0.35),
                offset: Vector::new(0.0, 4.0),
                blur_radius: 16.0,
            },
            ..Default::default()
        }
    }

    /// Card background: pulse beats armed beats selected.
    pub fn card_style(
        &self,
        selected: bool,
        armed: bool,
        pulsing: bool,
    ) -> impl Fn(&Theme) -> container::Style {
        let bg = if pulsing {
            self.pulse
        } else if armed {
            self.armed
        } else if selected {
            self.selected
        } else {
            self.card_bg
        };
        let border = if selected { self.accent } else { self.border };
        move |_theme: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border {
                color: border,
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }
    }

    pub fn toast_style(&self, kind: ToastKind) -> impl Fn(&Theme) -> container::Style {
        let (bg, edge) = (self.input_bg, self.toast_color(kind));
        move |_theme: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border {
                color: edge,
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }
    }

    /// Flat icon buttons (edit, delete, add, close).
    pub fn icon_button_style(&self, tint: Color) -> impl Fn(&Theme, button::Status) -> button::Style {
        let hover = self.selected;
        move |_theme: &Theme, status: button::Status| {
            let background = match status {
                button::Status::Hovered | button::Status::Pressed => {
                    Some(Background::Color(hover))
                }
                _ => None,
            };
            button::Style {
                background,
                text_color: tint,
                border: Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                ..button::Style::default()
            }
        }
    }

    pub fn primary_button_style(&self) -> impl Fn(&Theme, button::Status) -> button::Style {
        let (accent, text) = (self.accent, self.panel_bg);
        move |_theme: &Theme, status: button::Status| {
            let alpha = match status {
                button::Status::Disabled => 0.4,
                button::Status::Hovered => 0.85,
                _ => 1.0,
            };
            button::Style {
                background: Some(Background::Color(Color { a: alpha, ..accent })),
                text_color: text,
                border: Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                ..button::Style::default()
            }
        }
    }

    pub fn search_style(&self) -> impl Fn(&Theme, text_input::Status) -> text_input::Style {
        let c = *self;
        move |theme: &Theme, status: text_input::Status| text_input::Style {
            background: Background::Color(c.input_bg),
            border: Border {
                color: c.border,
                width: 1.0,
                radius: 6.0.into(),
            },
            placeholder: c.muted,
            value: c.text,
            ..text_input::default(theme, status)
        }
    }

    pub fn editor_style(&self) -> impl Fn(&Theme, text_editor::Status) -> text_editor::Style {
        let c = *self;
        move |theme: &Theme, status: text_editor::Status| text_editor::Style {
            background: Background::Color(c.input_bg),
            border: Border {
                color: c.border,
                width: 1.0,
                radius: 6.0.into(),
            },
            placeholder: c.muted,
            value: c.text,
            ..text_editor::default(theme, status)
        }
    }
}

/// Ask the desktop for its color scheme. Spawns CLI tools synchronously,
/// so call it off the UI thread.
pub fn detect_system_dark() -> bool {
    // XDG Desktop Portal: 0=no preference, 1=dark, 2=light
    if let Ok(output) = std::process::Command::new("dbus-send")
        .args([
            "--session",
            "--print-reply=literal",
            "--dest=org.freedesktop.portal.Desktop",
            "/org/freedesktop/portal/desktop",
            "org.freedesktop.portal.Settings.ReadOne",
            "string:org.freedesktop.appearance",
            "string:color-scheme",
        ])
        .output()
    {
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(dark) = parse_portal_scheme(&stdout) {
                return dark;
            }
        }
    }

    if let Ok(output) = std::process::Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
    {
        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(dark) = parse_gsettings_scheme(&stdout) {
            return dark;
        }
    }

    if let Ok(val) = std::env::var("GTK_THEME") {
        return val.to_lowercase().contains("dark");
    }

    true
}

fn parse_portal_scheme(reply: &str) -> Option<bool> {
    if reply.contains("uint32 1") {
        Some(true)
    } else if reply.contains("uint32 2") {
        Some(false)
    } else {
        None
    }
}

fn parse_gsettings_scheme(reply: &str) -> Option<bool> {
    if reply.contains("prefer-dark") {
        Some(true)
    } else if reply.contains("prefer-light") || reply.contains("default") {
        Some(false)
    } else {
        None
    }
}

/// Resolve the initial ThemeColors for a given mode.
pub fn resolve(mode: ThemeMode) -> ThemeColors {
    let dark = match mode {
        ThemeMode::Dark => true,
        ThemeMode::Light => false,
        ThemeMode::Auto => detect_system_dark(),
    };
    if dark {
        ThemeColors::dark()
    } else {
        ThemeColors::light()
    }
}
