use iced::keyboard::{key::Named, Key};
use iced::widget::text_editor::{Binding, KeyPress};
use iced::widget::{self, button, column, row, space, text, text_editor};
use iced::{Element, Length};

use crate::app::{Hud, Message, EDITOR_ID};
use crate::editor::EditorMode;
use crate::session::Action;

impl Hud {
    pub(crate) fn view_editor(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let editor = self.session.editor();

        let title = match editor.mode() {
            EditorMode::Editing(_) => "Edit prompt",
            _ => "New prompt",
        };

        let input = text_editor(&self.editor_content)
            .id(widget::Id::new(EDITOR_ID))
            .placeholder("Type a prompt...")
            .on_action(Message::EditorAction)
            .key_binding(save_binding)
            .size(colors.body_text)
            .padding(8)
            .height(Length::Fill)
            .style(colors.editor_style());

        let mut col = column![
            text(title).size(colors.title_text).color(colors.text),
            input
        ]
        .spacing(6)
        .height(Length::Fill);

        if let Some(error) = editor.error() {
            col = col.push(text(error.to_string()).size(colors.meta_text).color(colors.error));
        }

        let saving = editor.is_saving();
        let save = button(text(if saving { "Saving..." } else { "Save" }).size(colors.meta_text))
            .padding([4, 12])
            .style(colors.primary_button_style())
            .on_press_maybe((!saving).then_some(Message::Session(Action::EditorSave)));
        let cancel = button(text("Cancel").size(colors.meta_text))
            .padding([4, 12])
            .style(colors.icon_button_style(colors.muted))
            .on_press(Message::Session(Action::EditorCancel));

        col.push(row![
            text("Ctrl+Enter to save").size(colors.meta_text).color(colors.muted),
            space::horizontal(),
            cancel,
            save
        ]
        .spacing(6))
        .into()
    }
}

/// Ctrl/Cmd+Enter saves; everything else keeps the default editing keys.
fn save_binding(key_press: KeyPress) -> Option<Binding<Message>> {
    if is_save_chord(&key_press.key, key_press.modifiers.command()) {
        return Some(Binding::Custom(Message::Session(Action::EditorSave)));
    }
    Binding::from_key_press(key_press)
}

fn is_save_chord(key: &Key, command: bool) -> bool {
    command && matches!(key.as_ref(), Key::Named(Named::Enter))
}
