use chrono::{DateTime, Utc};
use iced::widget::text::Shaping;
use iced::widget::{self, button, column, container, mouse_area, row, scrollable, space, text};
use iced::{mouse, Alignment, Element, Length};

use crate::app::{Hud, Message, LIST_ID};
use crate::prompts::{LoadState, Prompt};
use crate::session::Action;
use crate::util::{self, truncate_str};

/// Longest card body before it is cut with "...".
const CARD_TEXT_CHARS: usize = 220;

impl Hud {
    pub(crate) fn view_list(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let list = self.session.list();

        let mut col = column![].spacing(6).width(Length::Fill);

        if let LoadState::Failed(reason) = list.state() {
            col = col.push(
                container(
                    row![
                        column![
                            text("Couldn't load prompts")
                                .size(colors.body_text)
                                .color(colors.error),
                            text(truncate_str(reason, 80))
                                .size(colors.meta_text)
                                .color(colors.muted),
                        ]
                        .spacing(2),
                        space::horizontal(),
                        button(text("Retry").size(colors.meta_text))
                            .padding([4, 10])
                            .style(colors.primary_button_style())
                            .on_press(Message::Session(Action::RetryLoad)),
                    ]
                    .align_y(Alignment::Center),
                )
                .padding(8)
                .style(colors.toast_style(crate::toast::ToastKind::Error)),
            );
        }

        if list.is_empty() {
            return col.push(self.view_empty()).into();
        }

        if list.is_refreshing() {
            col = col.push(
                text("Loading...")
                    .size(colors.meta_text)
                    .color(colors.muted),
            );
        }

        let now = Utc::now();
        let cards = column(
            list.prompts()
                .iter()
                .enumerate()
                .map(|(index, prompt)| self.view_card(index, prompt, now)),
        )
        .spacing(6);

        col.push(
            scrollable(cards)
                .id(widget::Id::new(LIST_ID))
                .height(Length::Fill),
        )
        .into()
    }

    fn view_empty(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let list = self.session.list();

        let content = match list.state() {
            LoadState::Loading | LoadState::Idle => column![
                text("Loading...").size(colors.body_text).color(colors.muted)
            ],
            LoadState::Failed(_) => column![],
            LoadState::Ready => {
                let headline = if self.session.query().trim().is_empty() {
                    "No prompts saved yet"
                } else {
                    "No prompts match your search"
                };
                column![
                    text(headline).size(colors.body_text).color(colors.text),
                    text(format!("Press {} to save a prompt", self.session.hotkey()))
                        .size(colors.meta_text)
                        .color(colors.muted),
                ]
                .spacing(4)
                .align_x(Alignment::Center)
            }
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .into()
    }

    fn view_card(&self, index: usize, prompt: &Prompt, now: DateTime<Utc>) -> Element<'_, Message> {
        let colors = &self.colors;
        let selection = self.session.selection();
        let selected = selection.selected() == Some(index);
        let armed = selection.is_armed(&prompt.id);
        let pulsing = self.session.is_pulsing(&prompt.id);

        let body = text(truncate_str(&util::sanitize_display(&prompt.text), CARD_TEXT_CHARS))
            .size(colors.body_text)
            .color(colors.text)
            .shaping(Shaping::Advanced);

        let mut meta = row![].spacing(6).align_y(Alignment::Center);
        if let Some(repo) = &prompt.repo {
            meta = meta.push(text(repo.clone()).size(colors.meta_text).color(colors.accent));
        }
        if let Some(branch) = &prompt.branch {
            meta = meta.push(text(branch.clone()).size(colors.meta_text).color(colors.muted));
        }
        meta = meta.push(
            text(util::relative_age(&prompt.timestamp, now))
                .size(colors.meta_text)
                .color(colors.muted),
        );

        let (delete_label, delete_tint) = if armed {
            ("Delete?", colors.error)
        } else {
            ("Delete", colors.muted)
        };
        let actions = row![
            button(text("Edit").size(colors.meta_text))
                .padding([2, 6])
                .style(colors.icon_button_style(colors.muted))
                .on_press(Message::Session(Action::EditPressed(prompt.id.clone()))),
            button(text(delete_label).size(colors.meta_text))
                .padding([2, 6])
                .style(colors.icon_button_style(delete_tint))
                .on_press(Message::Session(Action::DeletePressed(prompt.id.clone()))),
        ]
        .spacing(2);

        let card = container(
            column![body, row![meta, space::horizontal(), actions].align_y(Alignment::Center)]
                .spacing(6),
        )
        .padding(10)
        .width(Length::Fill)
        .style(colors.card_style(selected, armed, pulsing));

        mouse_area(card)
            .on_press(Message::Session(Action::CardClicked(prompt.id.clone())))
            .interaction(mouse::Interaction::Pointer)
            .into()
    }
}
