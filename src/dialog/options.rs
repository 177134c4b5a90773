use std::cell::RefCell;
use std::rc::Rc;

use super::{AppPopup, INVALID_FIELDS, restart_notice};
use crate::app::AppState;
use crate::fonts::FONT_SIZES;
use crate::logging::LogLevel;
use crate::theme::{THEME_NAMES, theme_from_name};
use crate::ui::Toast;

#[derive(Default)]
struct OptionsForm {
    log_level: usize,
    theme: usize,
    font_size: usize,
    quantity_step: String,
}

impl OptionsForm {
    fn from_state(state: &AppState) -> Self {
        Self {
            log_level: state.config.log_level.index(),
            theme: THEME_NAMES
                .iter()
                .position(|name| *name == state.config.theme.name)
                .unwrap_or(0),
            font_size: state.config.font_size,
            quantity_step: state.config.quantity_step.to_string(),
        }
    }

    fn quantity_step(&self) -> Option<f32> {
        self.quantity_step
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|step| step.is_finite() && *step > 0.0)
    }
}

/// Options popup. Log level and theme apply while browsing; closing without
/// saving puts the configured values back.
pub fn options(popup: &mut AppPopup, state: &AppState) {
    open(popup, OptionsForm::from_state(state), None);
}

fn open(popup: &mut AppPopup, form: OptionsForm, notice: Option<&str>) {
    let form = Rc::new(RefCell::new(form));
    let fields = Rc::clone(&form);
    let levels = LogLevel::ALL.map(LogLevel::name);

    let session = popup.open("Options");
    if let Some(notice) = notice {
        session.text_styled(notice, super::ALERT_STYLE, true).spacing();
    }
    session
        .action(move |ui, state| {
            let mut form = fields.borrow_mut();
            if ui.selector("Log level", levels.as_slice(), &mut form.log_level) {
                apply_level(state, LogLevel::from_index(form.log_level));
            }
            if ui.selector("Theme", THEME_NAMES, &mut form.theme) {
                state.theme = theme_from_name(THEME_NAMES[form.theme]);
            }
            ui.selector("Font size", FONT_SIZES, &mut form.font_size);
            ui.text_input("Quantity step", &mut form.quantity_step, false);
        })
        .spacing()
        .button("Save", move |state, popup| {
            let form = form.take();
            let Some(quantity_step) = form.quantity_step() else {
                open(popup, form, Some(INVALID_FIELDS));
                return;
            };
            save(state, popup, &form, quantity_step);
        })
        .on_close(|state, _| {
            apply_level(state, state.config.log_level);
            state.theme = theme_from_name(&state.config.theme.name);
        });
}

fn save(state: &mut AppState, popup: &mut AppPopup, form: &OptionsForm, quantity_step: f32) {
    let log_level = LogLevel::from_index(form.log_level);
    let theme_name = THEME_NAMES.get(form.theme).copied().unwrap_or(THEME_NAMES[0]);
    let restart = form.font_size != state.config.font_size;

    state.config.log_level = log_level;
    state.config.theme.name = theme_name.to_string();
    state.config.font_size = form.font_size;
    state.config.quantity_step = quantity_step;
    apply_level(state, log_level);
    state.theme = theme_from_name(theme_name);

    let font_size = form.font_size;
    let saved = state.save_config(|config| {
        config.log_level = log_level;
        config.theme.name = theme_name.to_string();
        config.font_size = font_size;
        config.quantity_step = quantity_step;
    });
    match saved {
        Ok(()) => state.toast(Toast::success("Options saved")),
        Err(error) => {
            tracing::error!("Failed to save options: {error}");
            state.toast(Toast::error("Failed to save options"));
        }
    }

    if restart {
        restart_notice(popup);
    }
}

fn apply_level(state: &AppState, level: LogLevel) {
    if let Err(error) = state.log_control.set_level(level) {
        tracing::warn!("Failed to change the log level: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;
    use crate::dialog::testing::{frame, press, tab};
    use crate::ui::{Ui, UiInput};

    #[test]
    fn test_theme_preview_is_reverted_on_close() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        options(&mut popup, &state);
        frame(&mut popup, &mut ui, &mut state);
        tab(&mut popup, &mut ui, &mut state, 1);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Right]);
        assert_eq!(state.theme, theme_from_name(THEME_NAMES[1]));

        press(&mut popup, &mut ui, &mut state, &[UiInput::Cancel]);
        assert!(!popup.is_open());
        assert_eq!(state.theme, Theme::default());
    }

    #[test]
    fn test_invalid_step_reopens_with_notice() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        options(&mut popup, &state);
        frame(&mut popup, &mut ui, &mut state);
        tab(&mut popup, &mut ui, &mut state, 3);
        press(
            &mut popup,
            &mut ui,
            &mut state,
            &[UiInput::Backspace, UiInput::Char('x'), UiInput::Next, UiInput::Activate],
        );

        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains(INVALID_FIELDS));
        assert!(text.contains("Quantity step: x"));
        assert!((state.config.quantity_step - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_form_reads_config() {
        let mut state = AppState::demo(None);
        state.config.log_level = LogLevel::Error;
        state.config.theme.name = THEME_NAMES[3].to_string();
        let form = OptionsForm::from_state(&state);

        assert_eq!(form.log_level, LogLevel::Error.index());
        assert_eq!(form.theme, 3);
        assert_eq!(form.quantity_step(), Some(1.0));
    }
}
