use super::AppPopup;
use crate::app::AppState;
use crate::version::{CURRENT, Release};
use crate::view;

pub fn about(popup: &mut AppPopup) {
    popup
        .open("About")
        .text_styled("partsbin", "Title", true)
        .text_centered("Inventory and bill of materials manager")
        .spacing()
        .text_centered(format!("Version {CURRENT}"))
        .text_centered(CURRENT.display());
}

/// Every key binding, grouped by where it applies.
pub fn user_guide(popup: &mut AppPopup, state: &AppState) {
    let session = popup.open("User Guide").size(60, 80);
    for (section, bindings) in view::keymap(&state.resolver) {
        session.text_styled(section, "Bold", false);
        let width = bindings.iter().map(|kb| kb.key.len()).max().unwrap_or(0);
        for kb in bindings {
            session.text(format!("  {:>width$}  {}", kb.key, kb.description));
        }
        session.spacing();
    }
}

/// Release notes for everything in `releases`. Closing it marks the running
/// version as seen.
pub fn whats_new(popup: &mut AppPopup, releases: &[&'static Release]) {
    let session = popup
        .open("What's new")
        .size(60, 60)
        .on_close(|state: &mut AppState, popup| {
            let version = CURRENT.to_string();
            let seen = Some(version.clone());
            if let Err(error) = state.save_config(|config| config.last_seen_version = seen) {
                tracing::warn!("Failed to record the last seen version: {error}");
            }
            state.config.last_seen_version = Some(version);
            if let Some(user) = state.login_hint.clone() {
                super::login(popup, user);
            }
        });
    for release in releases {
        session.text_styled(release.version.display(), "Bold", false);
        for note in release.notes {
            session.text(format!("  • {note}"));
        }
        session.spacing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;
    use crate::dialog::testing::frame;
    use crate::ui::Ui;
    use crate::version::changes_since;

    #[test]
    fn test_about_shows_version() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        about(&mut popup);
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains("1.1.0.100"));
        assert!(text.contains("v1.1.0 (build 100)"));
    }

    #[test]
    fn test_guide_lists_view_keys() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        user_guide(&mut popup, &state);
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains("Items"));
        assert!(text.contains("Make"));
        assert!(text.contains("Quit"));
    }

    #[test]
    fn test_whats_new_lists_unseen_releases() {
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let mut state = AppState::demo(None);

        whats_new(&mut popup, &changes_since(Some("1.0.1.60")));
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains("v1.1.0 (build 100)"));
        assert!(!text.contains("build 60"));
    }
}
