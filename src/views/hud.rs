use iced::widget::text::Shaping;
use iced::widget::{self, button, column, container, mouse_area, row, space, text, text_input};
use iced::{mouse, Alignment, Element, Length};

use crate::app::{Hud, Message, SEARCH_ID};
use crate::session::{Action, Count, Status};
use crate::util;
use crate::visibility::HudMode;

impl Hud {
    pub(crate) fn view_hud(&self) -> Element<'_, Message> {
        let panel = match self.session.mode() {
            HudMode::Collapsed => self.view_collapsed(),
            HudMode::Expanded => self.view_expanded(),
        };
        container(panel)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(self.colors.panel_style())
            .into()
    }

    /// Idle pill: the whole surface is a drag handle that expands on tap.
    fn view_collapsed(&self) -> Element<'_, Message> {
        let colors = &self.colors;

        // A fresh toast replaces the count line so hotkey saves are visible.
        let subtitle: Element<'_, Message> = match self.session.toast().current() {
            Some(toast) => text(format!("{} {}", toast.kind.icon(), toast.title))
                .size(colors.meta_text)
                .color(colors.toast_color(toast.kind))
                .shaping(Shaping::Advanced)
                .into(),
            None => text(self.count_text())
                .size(colors.meta_text)
                .color(colors.muted)
                .into(),
        };

        let content = row![
            self.status_dot(),
            column![
                text("promptmaxx").size(colors.title_text).color(colors.text),
                subtitle
            ]
            .spacing(2),
            space::horizontal(),
            text(self.session.hotkey())
                .size(colors.meta_text)
                .color(colors.muted),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let body = container(content)
            .padding([12, 16])
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill);

        mouse_area(body)
            .on_press(Message::IdlePressed)
            .on_release(Message::IdleReleased)
            .on_move(Message::PointerMoved)
            .interaction(mouse::Interaction::Grab)
            .into()
    }

    fn view_expanded(&self) -> Element<'_, Message> {
        let colors = &self.colors;

        let status = self.session.status();
        let status_label = if status == Status::Ready && self.session.list().in_flight() > 0 {
            "loading"
        } else {
            status.label()
        };
        let add = button(text("+").size(colors.title_text))
            .padding([2, 8])
            .style(colors.icon_button_style(colors.accent))
            .on_press(Message::Session(Action::AddPressed));
        let close = button(text("×").size(colors.title_text).shaping(Shaping::Advanced))
            .padding([2, 8])
            .style(colors.icon_button_style(colors.muted))
            .on_press(Message::Session(Action::Collapse));
        let header = mouse_area(
            container(
                row![
                    self.status_dot(),
                    text("promptmaxx").size(colors.title_text).color(colors.text),
                    text(status_label.to_string())
                        .size(colors.meta_text)
                        .color(colors.muted),
                    space::horizontal(),
                    add,
                    close,
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            )
            .padding([8, 12]),
        )
        .on_press(Message::Session(Action::HeaderPressed))
        .interaction(mouse::Interaction::Grab);

        let search = text_input("Search prompts...", self.session.query())
            .id(widget::Id::new(SEARCH_ID))
            .on_input(|query| Message::Session(Action::SearchChanged(query)))
            .size(colors.body_text)
            .padding([6, 10])
            .style(colors.search_style());

        let body = if self.session.editor().is_open() {
            self.view_editor()
        } else {
            self.view_list()
        };

        let mut main_col = column![header, container(search).padding([0, 12])]
            .spacing(8)
            .width(Length::Fill)
            .height(Length::Fill);
        main_col = main_col.push(container(body).padding([0, 12]).height(Length::Fill));

        if let Some(toast) = self.view_toast() {
            main_col = main_col.push(container(toast).padding([0, 12]));
        }

        let footer = row![
            text(self.count_text())
                .size(colors.meta_text)
                .color(colors.muted),
            space::horizontal(),
            text(format!("{} to save", self.session.hotkey()))
                .size(colors.meta_text)
                .color(colors.muted),
        ];
        main_col.push(container(footer).padding([6, 12])).into()
    }

    fn view_toast(&self) -> Option<Element<'_, Message>> {
        let colors = &self.colors;
        let toast = self.session.toast().current()?;
        let mut content = column![
            text(format!("{} {}", toast.kind.icon(), toast.title))
                .size(colors.body_text)
                .color(colors.toast_color(toast.kind))
                .shaping(Shaping::Advanced)
        ]
        .spacing(2);
        if !toast.preview.is_empty() {
            content = content.push(
                text(util::sanitize_display(&toast.preview))
                    .size(colors.meta_text)
                    .color(colors.muted)
                    .shaping(Shaping::Advanced),
            );
        }
        Some(
            container(content)
                .padding([6, 10])
                .width(Length::Fill)
                .style(colors.toast_style(toast.kind))
                .into(),
        )
    }

    fn status_dot(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let color = match self.session.status() {
            Status::Ready => colors.accent,
            Status::Saving => colors.duplicate,
            Status::Error(_) => colors.error,
        };
        text("●")
            .size(colors.meta_text)
            .color(color)
            .shaping(Shaping::Advanced)
            .into()
    }

    pub(crate) fn count_text(&self) -> String {
        match self.session.count() {
            Count::Unknown => String::from("..."),
            Count::Known(n) => util::count_label(*n),
            Count::Failed(_) => String::from("count unavailable"),
        }
    }
}
