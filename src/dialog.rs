//! Application dialogs, all opened through the popup engine.

mod auth;
mod help;
mod menu;
mod options;

use std::path::PathBuf;

pub use auth::login;
pub use help::{about, user_guide, whats_new};
pub use menu::main_menu;
pub use options::options;

use crate::app::AppState;
use crate::commands::OpenCmd;
use crate::ui::Popup;

pub type AppPopup = Popup<AppState>;

/// Red, packed the way style strings carry colors.
pub const ALERT_STYLE: &str = "Bold/4278190335";

pub const INVALID_FIELDS: &str = "Some fields are invalid, please retry";

pub fn error(popup: &mut AppPopup, message: &str) {
    popup.open("Error").text_styled(message, ALERT_STYLE, true);
}

pub fn unauthorized(popup: &mut AppPopup) {
    popup
        .open("Unauthorized")
        .text_styled("You must be logged in to do this action", ALERT_STYLE, true);
}

/// Ask before running `on_yes`. Escape or "No" leaves without doing anything.
pub fn confirm(
    popup: &mut AppPopup,
    title: &str,
    message: impl Into<String>,
    on_yes: impl FnOnce(&mut AppState, &mut AppPopup) + 'static,
) {
    popup
        .open(title)
        .hide_close()
        .text_centered(message)
        .spacing()
        .button("Yes", on_yes)
        .same_line()
        .committing("No", |ui, _, label| ui.button(label) || ui.close_requested(), |_, _| {});
}

pub fn file_generated(popup: &mut AppPopup, path: PathBuf) {
    popup
        .open("File Generated")
        .hide_close()
        .text_centered(path.display().to_string())
        .text_centered("Do you want to open it?")
        .spacing()
        .button("Yes", move |state, _| state.spawn(OpenCmd::file(path)))
        .same_line()
        .committing("No", |ui, _, label| ui.button(label) || ui.close_requested(), |_, _| {});
}

pub fn restart_notice(popup: &mut AppPopup) {
    popup
        .open("Options")
        .text_centered("The software must be restarted\nfor the changes to take effect");
}

#[cfg(test)]
pub(crate) mod testing {
    use super::AppPopup;
    use crate::Theme;
    use crate::app::AppState;
    use crate::ui::{Ui, UiInput};

    /// Render one frame and return its text, or `None` when nothing is open.
    pub fn frame(popup: &mut AppPopup, ui: &mut Ui, state: &mut AppState) -> Option<String> {
        ui.begin_frame(Theme::default());
        let frame = popup.render_frame(ui, state)?;
        Some(
            frame
                .lines
                .iter()
                .map(|line| {
                    line.spans
                        .iter()
                        .map(|span| span.content.as_ref())
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Feed `inputs` one per frame.
    pub fn press(popup: &mut AppPopup, ui: &mut Ui, state: &mut AppState, inputs: &[UiInput]) {
        for &input in inputs {
            ui.feed(input);
            frame(popup, ui, state);
        }
    }

    pub fn type_text(popup: &mut AppPopup, ui: &mut Ui, state: &mut AppState, text: &str) {
        for c in text.chars() {
            press(popup, ui, state, &[UiInput::Char(c)]);
        }
    }

    /// Move focus `steps` widgets forward.
    pub fn tab(popup: &mut AppPopup, ui: &mut Ui, state: &mut AppState, steps: usize) {
        for _ in 0..steps {
            press(popup, ui, state, &[UiInput::Next]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{frame, press, tab};
    use super::*;
    use crate::Theme;
    use crate::ui::{Ui, UiInput};

    #[test]
    fn test_confirm_runs_on_yes_once() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        confirm(&mut popup, "Quit", "Are you sure?", |state, _| {
            state.should_quit = !state.should_quit;
        });
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains("Are you sure?"));
        assert!(!text.contains("Close"));

        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);
        assert!(state.should_quit);
        assert!(!popup.is_open());
        assert!(frame(&mut popup, &mut ui, &mut state).is_none());
    }

    #[test]
    fn test_confirm_escape_declines() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        confirm(&mut popup, "Quit", "Are you sure?", |state, _| state.should_quit = true);
        frame(&mut popup, &mut ui, &mut state);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Cancel]);
        assert!(!state.should_quit);
        assert!(!popup.is_open());
    }

    #[test]
    fn test_file_generated_yes_queues_opener() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        file_generated(&mut popup, PathBuf::from("/tmp/items.csv"));
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains("Do you want to open it?"));
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);
        assert_eq!(state.take_commands().len(), 1);

        file_generated(&mut popup, PathBuf::from("/tmp/items.csv"));
        frame(&mut popup, &mut ui, &mut state);
        tab(&mut popup, &mut ui, &mut state, 1);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);
        assert!(state.take_commands().is_empty());
        assert!(!popup.is_open());
    }

    #[test]
    fn test_unauthorized_message() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        unauthorized(&mut popup);
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains("You must be logged in to do this action"));
        assert!(text.contains("Close"));
    }
}
