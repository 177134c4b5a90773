use std::cell::RefCell;
use std::rc::Rc;

use super::{ALERT_STYLE, AppPopup};
use crate::ui::Toast;

#[derive(Default)]
struct Credentials {
    username: String,
    password: String,
}

/// Login popup. A failed attempt shows a notice that leads back here with the
/// username kept.
pub fn login(popup: &mut AppPopup, username: String) {
    let form = Rc::new(RefCell::new(Credentials {
        username,
        password: String::new(),
    }));
    let fields = Rc::clone(&form);

    popup
        .open("Login")
        .action(move |ui, _| {
            let mut fields = fields.borrow_mut();
            let Credentials { username, password } = &mut *fields;
            ui.text_input("Username", username, false);
            ui.text_input("Password", password, true);
        })
        .spacing()
        .button("Login", move |state, popup| {
            let Credentials { username, password } = form.take();
            match state.inventory.login(&username, &password) {
                Ok(true) => state.toast(Toast::success(format!("Logged in as {username}"))),
                Ok(false) => login_failed(popup, username),
                Err(error) => state.report(popup, &error),
            }
        });
}

fn login_failed(popup: &mut AppPopup, username: String) {
    popup
        .open("Login")
        .text_styled("Invalid username and/or password!", ALERT_STYLE, true)
        .on_close(move |_, popup| login(popup, username));
}
