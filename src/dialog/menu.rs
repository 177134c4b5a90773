use super::{AppPopup, about, login, options, user_guide};
use crate::app::{AppState, Tab};
use crate::ui::Toast;

/// The main menu: File, Help and the viewer tabs.
pub fn main_menu(popup: &mut AppPopup, state: &AppState) {
    let logged_in = state.inventory.session().username().is_some();
    let session = popup.open("Menu");

    session
        .text_styled("File", "Bold", false)
        .button("Open Logger", |state, _| state.tab = Tab::Logger)
        .button("Options", |state, popup| options(popup, state));
    if logged_in {
        session.button("Logout", |state, _| {
            state.inventory.logout();
            state.toast(Toast::info("Logged out"));
        });
    } else {
        session.button("Login", |state, popup| {
            login(popup, state.login_hint.clone().unwrap_or_default());
        });
    }
    session
        .button("Quit", |state, _| state.should_quit = true)
        .action(|ui, _| ui.separator())
        .text_styled("Help", "Bold", false)
        .button("User Guide", |state, popup| user_guide(popup, state))
        .button("About", |_, popup| about(popup))
        .action(|ui, _| ui.separator())
        .text_styled("Tabs", "Bold", false);
    for (i, tab) in Tab::ALL.into_iter().enumerate() {
        if i > 0 {
            session.same_line();
        }
        session.button(tab.title(), move |state, _| state.tab = tab);
    }
}
