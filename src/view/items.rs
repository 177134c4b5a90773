use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::widgets::Cell;

use super::{View, require_write};
use crate::Theme;
use crate::app::AppState;
use crate::commands::{CopyToClipboardCmd, OpenCmd};
use crate::config::{ItemAction, KeyResolver};
use crate::dialog::{self, AppPopup, INVALID_FIELDS};
use crate::export;
use crate::filter::Filterable;
use crate::model::{Item, ItemStatus};
use crate::ui::{Component, Handled, Keybinding, Result, Table, TableEvent, TableRow, Toast, Ui};

impl TableRow for Item {
    fn widths() -> &'static [Constraint] {
        &[
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(14),
        ]
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        (0..Self::COLUMNS.len())
            .map(|column| {
                let cell = Cell::from(self.column_text(column));
                match column {
                    6 if self.quantity <= 0.0 => cell.style(Style::default().fg(theme.red())),
                    8 => cell.style(Style::default().fg(theme.item_status(self.status))),
                    _ => cell,
                }
            })
            .collect()
    }
}

pub struct ItemsView {
    table: Table<Item>,
    resolver: Arc<KeyResolver>,
}

impl ItemsView {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            table: Table::new("Items", Arc::clone(&resolver)),
            resolver,
        }
    }

    fn add(state: &AppState, popup: &mut AppPopup) {
        if !require_write(state, popup) {
            return;
        }
        let categories = category_names(state);
        if categories.is_empty() {
            dialog::error(popup, "Add a category first");
            return;
        }
        open_editor(popup, None, ItemForm::default(), categories, None);
    }

    fn edit(item: Item, state: &AppState, popup: &mut AppPopup) {
        if !require_write(state, popup) {
            return;
        }
        let categories = category_names(state);
        let form = ItemForm::from_item(&item, &categories);
        open_editor(popup, Some(item), form, categories, None);
    }

    fn delete(item: Item, state: &AppState, popup: &mut AppPopup) {
        if !require_write(state, popup) {
            return;
        }
        let message = format!("Are you sure you want to delete {}?", item.id);
        dialog::confirm(popup, "Delete Item", message, move |state, popup| {
            match state.inventory.delete_item(&item) {
                Ok(true) => state.toast(Toast::success(format!("Deleted {}", item.id))),
                Ok(false) => state.toast(Toast::error(format!("{} no longer exists", item.id))),
                Err(error) => state.report(popup, &error),
            }
        });
    }

    fn adjust(&self, state: &mut AppState, popup: &mut AppPopup, sign: f32) {
        let Some(id) = self.table.selected().map(|item| item.id.clone()) else {
            return;
        };
        let delta = sign * state.config.quantity_step;
        if let Err(error) = state.inventory.adjust_quantity(&id, delta) {
            state.report(popup, &error);
        }
    }

    fn export(&self, state: &AppState, popup: &mut AppPopup) {
        let dir = state.config.resolved_export_dir();
        match export::export_items(&dir, &self.table.visible_rows()) {
            Ok(path) => dialog::file_generated(popup, path),
            Err(error) => {
                tracing::error!("Item export failed: {error:#}");
                dialog::error(popup, &format!("Export failed: {error}"));
            }
        }
    }
}

impl View for ItemsView {
    fn sync(&mut self, state: &AppState) {
        let items = state.inventory.items().all();
        if self.table.items() != items {
            self.table.set_items(items.to_vec());
        }
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        state: &mut AppState,
        popup: &mut AppPopup,
    ) -> Result<Handled<()>> {
        if self.table.is_filtering() {
            return Ok(self.table.handle_key(key)?.map(|_| ()));
        }

        let r = Arc::clone(&self.resolver);
        let selected = self.table.selected().cloned();
        if r.matches_items(&key, ItemAction::Add) {
            Self::add(state, popup);
        } else if r.matches_items(&key, ItemAction::Edit) {
            if let Some(item) = selected {
                Self::edit(item, state, popup);
            }
        } else if r.matches_items(&key, ItemAction::Delete) {
            if let Some(item) = selected {
                Self::delete(item, state, popup);
            }
        } else if r.matches_items(&key, ItemAction::Increment) {
            self.adjust(state, popup, 1.0);
        } else if r.matches_items(&key, ItemAction::Decrement) {
            self.adjust(state, popup, -1.0);
        } else if r.matches_items(&key, ItemAction::Copy) {
            if let Some(item) = selected {
                state.spawn(CopyToClipboardCmd::new(item.id.clone(), format!("item id {}", item.id)));
            }
        } else if r.matches_items(&key, ItemAction::OpenLink) {
            if let Some(item) = selected {
                match item.reference_url() {
                    Some(url) => state.spawn(OpenCmd::url(&url)),
                    None => state.toast(Toast::info(format!("{} has no web link", item.id))),
                }
            }
        } else if r.matches_items(&key, ItemAction::Export) {
            self.export(state, popup);
        } else {
            return Ok(match self.table.handle_key(key)? {
                Handled::Event(TableEvent::Activated(item)) => {
                    Self::edit(item, state, popup);
                    Handled::Consumed
                }
                other => other.map(|_| ()),
            });
        }
        Ok(Handled::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.table.render(frame, area, &state.theme);
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        keybindings(&self.resolver)
    }
}

pub(super) fn keybindings(r: &KeyResolver) -> Vec<Keybinding> {
    vec![
        Keybinding::hint(r.display_items(ItemAction::Add), "Add"),
        Keybinding::hint(r.display_items(ItemAction::Edit), "Edit"),
        Keybinding::hint(r.display_items(ItemAction::Delete), "Delete"),
        Keybinding::hint(
            format!(
                "{}/{}",
                r.display_items(ItemAction::Increment),
                r.display_items(ItemAction::Decrement)
            ),
            "Quantity",
        ),
        Keybinding::new(r.display_items(ItemAction::Copy), "Copy ID"),
        Keybinding::new(r.display_items(ItemAction::OpenLink), "Open link"),
        Keybinding::new(r.display_items(ItemAction::Export), "Export CSV"),
    ]
}

const DUPLICATE_ITEM: &str = "An item with this ID already exists";
const IDS_EXHAUSTED: &str = "No free ID left in this category";

fn category_names(state: &AppState) -> Vec<String> {
    state
        .inventory
        .categories()
        .all()
        .iter()
        .map(|c| c.name.clone())
        .collect()
}

#[derive(Debug, Clone, Default)]
struct ItemForm {
    id: String,
    description: String,
    category: usize,
    reference_link: String,
    location: String,
    price: String,
    quantity: String,
    unit: String,
    status: usize,
}

impl ItemForm {
    fn from_item(item: &Item, categories: &[String]) -> Self {
        Self {
            id: item.id.clone(),
            description: item.description.clone(),
            category: categories
                .iter()
                .position(|name| *name == item.category)
                .unwrap_or(0),
            reference_link: item.reference_link.clone(),
            location: item.location.clone(),
            price: item.price.to_string(),
            quantity: item.quantity.to_string(),
            unit: item.unit.clone(),
            status: item.status as usize,
        }
    }

    fn draw(&mut self, ui: &mut Ui, categories: &[String]) {
        let statuses = ItemStatus::ALL.map(ItemStatus::as_str);
        ui.text_input("ID", &mut self.id, false);
        ui.text_input("Description", &mut self.description, false);
        ui.selector("Category", categories, &mut self.category);
        ui.text_input("Reference", &mut self.reference_link, false);
        ui.text_input("Location", &mut self.location, false);
        ui.text_input("Price", &mut self.price, false);
        ui.text_input("Quantity", &mut self.quantity, false);
        ui.text_input("Unit", &mut self.unit, false);
        ui.selector("Status", statuses.as_slice(), &mut self.status);
    }

    /// The item described by the form, or the notice to reopen it with.
    ///
    /// An empty id takes the next free one in the category. Otherwise the id
    /// is a bare number or follows the category format, and is normalized.
    fn build(
        &self,
        state: &AppState,
        categories: &[String],
        original: Option<&Item>,
    ) -> std::result::Result<Item, &'static str> {
        let category = categories
            .get(self.category)
            .and_then(|name| state.inventory.categories().find(name))
            .ok_or(INVALID_FIELDS)?;

        let typed = self.id.trim();
        let number = if typed.is_empty() {
            None
        } else {
            let number = typed.parse::<u64>().ok().or_else(|| category.parse_id(typed));
            Some(number.ok_or(INVALID_FIELDS)?)
        };
        let id = state
            .inventory
            .new_item_id(category, number)
            .ok_or(IDS_EXHAUSTED)?;
        let renamed = original.is_none_or(|old| old.id != id);
        if renamed && state.inventory.items().get_by_id(&id).is_some() {
            return Err(DUPLICATE_ITEM);
        }

        let item = Item {
            id,
            description: self.description.trim().to_string(),
            category: category.name.clone(),
            reference_link: self.reference_link.trim().to_string(),
            location: self.location.trim().to_string(),
            price: parse_number(&self.price).ok_or(INVALID_FIELDS)?,
            quantity: parse_number(&self.quantity).ok_or(INVALID_FIELDS)?,
            unit: self.unit.trim().to_string(),
            status: ItemStatus::from_index(self.status),
        };
        if item.is_valid() {
            Ok(item)
        } else {
            Err(INVALID_FIELDS)
        }
    }
}

/// Blank counts as zero.
fn parse_number(text: &str) -> Option<f32> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    text.parse::<f32>().ok().filter(|n| n.is_finite())
}

fn open_editor(
    popup: &mut AppPopup,
    original: Option<Item>,
    form: ItemForm,
    categories: Vec<String>,
    notice: Option<&str>,
) {
    let title = if original.is_some() { "Edit Item" } else { "Add Item" };
    let form = Rc::new(RefCell::new(form));
    let fields = Rc::clone(&form);
    let options = categories.clone();

    let session = popup.open(title).size(60, 70);
    if let Some(notice) = notice {
        session.text_styled(notice, dialog::ALERT_STYLE, true).spacing();
    }
    session
        .action(move |ui, _| fields.borrow_mut().draw(ui, &options))
        .spacing()
        .button("Save", move |state, popup| {
            let form = form.take();
            let item = match form.build(state, &categories, original.as_ref()) {
                Ok(item) => item,
                Err(notice) => {
                    open_editor(popup, original, form, categories, Some(notice));
                    return;
                }
            };
            let id = item.id.clone();
            let result = match &original {
                Some(old) => state.inventory.edit_item(old, item).map(|_| ()),
                None => state.inventory.add_item(item),
            };
            match result {
                Ok(()) => state.toast(Toast::success(format!("Saved {id}"))),
                Err(error) => state.report(popup, &error),
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;
    use crate::commands::Command;
    use crate::dialog::testing::{frame, press, tab, type_text};
    use crate::ui::UiInput;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn setup(user: Option<&str>) -> (ItemsView, AppState, AppPopup, Ui) {
        let state = AppState::demo(user);
        let mut view = ItemsView::new(Arc::clone(&state.resolver));
        view.sync(&state);
        (view, state, AppPopup::new(), Ui::new(Theme::default()))
    }

    #[test]
    fn test_add_item_generates_id() {
        let (mut view, mut state, mut popup, mut ui) = setup(Some("admin"));

        view.handle_key(key('a'), &mut state, &mut popup).unwrap();
        assert_eq!(popup.title(), Some("Add Item"));
        frame(&mut popup, &mut ui, &mut state);
        tab(&mut popup, &mut ui, &mut state, 1);
        type_text(&mut popup, &mut ui, &mut state, "Shunt");
        tab(&mut popup, &mut ui, &mut state, 8);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);

        assert!(!popup.is_open());
        let item = state.inventory.items().get_by_id("R2").unwrap();
        assert_eq!(item.description, "Shunt");
        assert_eq!(item.category, "Resistors");
    }

    #[test]
    fn test_invalid_item_reopens_editor() {
        let (mut view, mut state, mut popup, mut ui) = setup(Some("admin"));

        view.handle_key(key('a'), &mut state, &mut popup).unwrap();
        frame(&mut popup, &mut ui, &mut state);
        tab(&mut popup, &mut ui, &mut state, 9);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);

        assert_eq!(popup.title(), Some("Add Item"));
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains(INVALID_FIELDS));
        assert_eq!(state.inventory.items().all().len(), 5);
    }

    #[test]
    fn test_delete_after_confirm() {
        let (mut view, mut state, mut popup, mut ui) = setup(Some("admin"));
        assert_eq!(view.table.selected().unwrap().id, "C0");

        view.handle_key(key('d'), &mut state, &mut popup).unwrap();
        frame(&mut popup, &mut ui, &mut state);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);

        assert!(state.inventory.items().get_by_id("C0").is_none());
        view.sync(&state);
        assert_eq!(view.table.items().len(), 4);
    }

    #[test]
    fn test_quantity_step() {
        let (mut view, mut state, mut popup, _) = setup(Some("admin"));
        state.config.quantity_step = 5.0;

        view.handle_key(key('+'), &mut state, &mut popup).unwrap();
        assert!((state.inventory.items().get_by_id("C0").unwrap().quantity - 13.0).abs() < 1e-6);
        for _ in 0..3 {
            view.handle_key(key('-'), &mut state, &mut popup).unwrap();
        }
        assert!(state.inventory.items().get_by_id("C0").unwrap().quantity.abs() < 1e-6);
    }

    #[test]
    fn test_read_only_user_is_refused() {
        let (mut view, mut state, mut popup, _) = setup(Some("guest"));

        view.handle_key(key('a'), &mut state, &mut popup).unwrap();
        assert_eq!(popup.title(), Some("Unauthorized"));

        popup.close();
        view.handle_key(key('+'), &mut state, &mut popup).unwrap();
        assert_eq!(popup.title(), Some("Unauthorized"));
        assert!((state.inventory.items().get_by_id("C0").unwrap().quantity - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_copy_queues_command() {
        let (mut view, mut state, mut popup, _) = setup(None);

        view.handle_key(key('y'), &mut state, &mut popup).unwrap();
        assert_eq!(state.take_commands().len(), 1);
        assert!(!popup.is_open());
    }

    #[test]
    fn test_open_link_needs_web_url() {
        let (mut view, mut state, mut popup, _) = setup(None);
        assert_eq!(view.table.selected().unwrap().id, "C0");

        view.handle_key(key('l'), &mut state, &mut popup).unwrap();
        assert!(state.take_commands().is_empty());

        let mut item = state.inventory.items().get_by_id("C0").unwrap().clone();
        item.reference_link = "https://example.com/c0".into();
        view.table.set_items(vec![item]);
        view.handle_key(key('l'), &mut state, &mut popup).unwrap();
        let commands = state.take_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name(), "Opening https://example.com/c0");
    }

    #[test]
    fn test_export_opens_file_generated() {
        let (mut view, mut state, mut popup, _) = setup(None);
        let dir = tempfile::tempdir().unwrap();
        state.config.export_dir = Some(dir.path().to_path_buf());

        view.handle_key(key('x'), &mut state, &mut popup).unwrap();
        assert_eq!(popup.title(), Some("File Generated"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_numeric_id_uses_category_format() {
        let state = AppState::demo(Some("admin"));
        let categories = category_names(&state);
        let form = ItemForm {
            id: "7".into(),
            description: "Header".into(),
            category: 2,
            ..ItemForm::default()
        };

        let item = form.build(&state, &categories, None).unwrap();
        assert_eq!(item.id, "CON7A");
        assert_eq!(item.category, "Connectors");
    }

    #[test]
    fn test_typed_id_must_follow_category_format() {
        let state = AppState::demo(Some("admin"));
        let categories = category_names(&state);
        let mut form = ItemForm {
            id: "con9a".into(),
            description: "Header".into(),
            category: 2,
            ..ItemForm::default()
        };
        assert_eq!(form.build(&state, &categories, None).unwrap().id, "CON9A");

        form.id = "HEADER-9".into();
        assert_eq!(form.build(&state, &categories, None), Err(INVALID_FIELDS));
    }

    #[test]
    fn test_existing_id_is_refused() {
        let (mut view, mut state, mut popup, mut ui) = setup(Some("admin"));

        view.handle_key(key('a'), &mut state, &mut popup).unwrap();
        frame(&mut popup, &mut ui, &mut state);
        type_text(&mut popup, &mut ui, &mut state, "R0");
        tab(&mut popup, &mut ui, &mut state, 1);
        type_text(&mut popup, &mut ui, &mut state, "Copy");
        tab(&mut popup, &mut ui, &mut state, 8);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);

        assert_eq!(popup.title(), Some("Add Item"));
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains(DUPLICATE_ITEM));
        assert_eq!(state.inventory.items().all().len(), 5);
    }

    #[test]
    fn test_numbering_limit_reopens_editor() {
        let mut state = AppState::demo(Some("admin"));
        let categories = category_names(&state);
        let mut form = ItemForm {
            id: "R18446744073709551615".into(),
            description: "Last".into(),
            ..ItemForm::default()
        };
        let item = form.build(&state, &categories, None).unwrap();
        state.inventory.add_item(item).unwrap();

        form.id.clear();
        assert_eq!(form.build(&state, &categories, None), Err(IDS_EXHAUSTED));
    }

    #[test]
    fn test_edit_keeps_own_id() {
        let state = AppState::demo(Some("admin"));
        let categories = category_names(&state);
        let item = state.inventory.items().get_by_id("R1").unwrap().clone();
        let form = ItemForm::from_item(&item, &categories);

        assert_eq!(form.build(&state, &categories, Some(&item)).unwrap().id, "R1");
    }
}
