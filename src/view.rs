//! The four viewer tabs.
//!
//! All views implement the [`View`] trait. A view owns its table state; the
//! inventory itself lives in [`AppState`] and is pulled in by [`View::sync`].

mod boms;
mod categories;
mod items;
mod logger;

pub use boms::BomsView;
pub use categories::CategoriesView;
pub use items::ItemsView;
pub use logger::LoggerView;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::AppState;
use crate::config::{FilterAction, KeyResolver, NavAction, TableAction};
use crate::dialog::{self, AppPopup};
use crate::ui::{Handled, Keybinding, Result, StatusBar};

pub trait View {
    /// Pull fresh rows from the inventory when they changed.
    fn sync(&mut self, state: &AppState);

    /// Handle a key while no popup is open. Dialogs are opened on `popup`.
    fn handle_key(
        &mut self,
        key: KeyEvent,
        state: &mut AppState,
        popup: &mut AppPopup,
    ) -> Result<Handled<()>>;

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Keys specific to this view, for the hint bar.
    fn keybindings(&self) -> Vec<Keybinding>;
}

/// Open the unauthorized notice unless the session may write.
fn require_write(state: &AppState, popup: &mut AppPopup) -> bool {
    let allowed = state.inventory.can_write();
    if !allowed {
        dialog::unauthorized(popup);
    }
    allowed
}

/// Keys shared by every table view.
fn table_keybindings(resolver: &KeyResolver) -> Vec<Keybinding> {
    vec![
        Keybinding::hint(resolver.display_filter(FilterAction::Toggle), "Filter"),
        Keybinding::new(resolver.display_filter(FilterAction::NextColumn), "Filter column"),
        Keybinding::new(
            format!(
                "{}/{}",
                resolver.display_table(TableAction::SortPrev),
                resolver.display_table(TableAction::SortNext)
            ),
            "Sort column",
        ),
        Keybinding::new(resolver.display_table(TableAction::SortReverse), "Reverse sort"),
        Keybinding::new(resolver.display_nav(NavAction::Home), "First row"),
        Keybinding::new(resolver.display_nav(NavAction::End), "Last row"),
    ]
}

/// Every binding grouped by section, as listed in the user guide.
pub fn keymap(resolver: &std::sync::Arc<KeyResolver>) -> Vec<(&'static str, Vec<Keybinding>)> {
    vec![
        (
            "Global",
            StatusBar::new(std::sync::Arc::clone(resolver)).global_keybindings(),
        ),
        ("Tables", table_keybindings(resolver)),
        ("Items", items::keybindings(resolver)),
        ("Categories", categories::keybindings(resolver)),
        ("BOMs", boms::keybindings(resolver)),
        ("Logger", logger::keybindings(resolver)),
    ]
}
