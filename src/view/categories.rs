use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::Cell;

use super::{View, require_write};
use crate::Theme;
use crate::app::AppState;
use crate::config::{CategoryAction, KeyResolver};
use crate::dialog::{self, AppPopup, INVALID_FIELDS};
use crate::filter::Filterable;
use crate::model::Category;
use crate::ui::{Component, Handled, Keybinding, Result, Table, TableRow, Toast};

impl TableRow for Category {
    fn widths() -> &'static [Constraint] {
        &[Constraint::Min(20), Constraint::Length(10), Constraint::Length(8)]
    }

    fn render_cells(&self, _theme: &Theme) -> Vec<Cell<'static>> {
        (0..Self::COLUMNS.len())
            .map(|column| Cell::from(self.column_text(column)))
            .collect()
    }
}

pub struct CategoriesView {
    table: Table<Category>,
    resolver: Arc<KeyResolver>,
}

impl CategoriesView {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            table: Table::new("Categories", Arc::clone(&resolver)),
            resolver,
        }
    }
}

impl View for CategoriesView {
    fn sync(&mut self, state: &AppState) {
        let categories = state.inventory.categories().all();
        if self.table.items() != categories {
            self.table.set_items(categories.to_vec());
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

        if self.resolver.matches_categories(&key, CategoryAction::Add) {
            if require_write(state, popup) {
                open_editor(popup, None, CategoryForm::default(), None);
            }
        } else if self.resolver.matches_categories(&key, CategoryAction::Edit) {
            if let Some(category) = self.table.selected().cloned() {
                if require_write(state, popup) {
                    let form = CategoryForm::from_category(&category);
                    open_editor(popup, Some(category), form, None);
                }
            }
        } else if self.resolver.matches_categories(&key, CategoryAction::Delete) {
            if let Some(category) = self.table.selected().cloned() {
                if require_write(state, popup) {
                    confirm_delete(popup, category);
                }
            }
        } else {
            return Ok(self.table.handle_key(key)?.map(|_| ()));
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
        Keybinding::hint(r.display_categories(CategoryAction::Add), "Add"),
        Keybinding::hint(r.display_categories(CategoryAction::Edit), "Edit"),
        Keybinding::hint(r.display_categories(CategoryAction::Delete), "Delete"),
    ]
}

const DUPLICATE_CATEGORY: &str = "A category with this name or prefix already exists";

#[derive(Debug, Default)]
struct CategoryForm {
    name: String,
    prefix: String,
    suffix: String,
}

impl CategoryForm {
    fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            prefix: category.prefix.clone(),
            suffix: category.suffix.map(String::from).unwrap_or_default(),
        }
    }

    /// At most one suffix character is allowed.
    fn build(&self) -> Option<Category> {
        let mut suffix = self.suffix.trim().chars();
        let first = suffix.next();
        if suffix.next().is_some() {
            return None;
        }
        let category = Category::new(
            self.name.trim(),
            self.prefix.trim().to_uppercase(),
            first.map(|c| c.to_ascii_uppercase()),
        );
        category.is_valid().then_some(category)
    }
}

fn open_editor(
    popup: &mut AppPopup,
    original: Option<Category>,
    form: CategoryForm,
    notice: Option<&str>,
) {
    let title = if original.is_some() { "Edit Category" } else { "Add Category" };
    let form = Rc::new(RefCell::new(form));
    let fields = Rc::clone(&form);

    let session = popup.open(title);
    if let Some(notice) = notice {
        session.text_styled(notice, dialog::ALERT_STYLE, true).spacing();
    }
    session
        .action(move |ui, _| {
            let mut form = fields.borrow_mut();
            let CategoryForm {
                name,
                prefix,
                suffix,
            } = &mut *form;
            ui.text_input("Name", name, false);
            ui.text_input("Prefix", prefix, false);
            ui.text_input("Suffix", suffix, false);
        })
        .spacing()
        .button("Save", move |state, popup| {
            let form = form.take();
            let Some(category) = form.build() else {
                open_editor(popup, original, form, Some(INVALID_FIELDS));
                return;
            };
            // The category being edited may keep its own name and prefix.
            let taken = |found: Option<Category>| {
                found.is_some_and(|found| original.as_ref().is_none_or(|old| *old != found))
            };
            if taken(state.inventory.category_by_name(&category.name))
                || taken(state.inventory.category_by_prefix(&category.prefix))
            {
                open_editor(popup, original, form, Some(DUPLICATE_CATEGORY));
                return;
            }
            let name = category.name.clone();
            let result = match &original {
                Some(old) => state.inventory.edit_category(old, category).map(|_| ()),
                None => state.inventory.add_category(category),
            };
            match result {
                Ok(()) => state.toast(Toast::success(format!("Saved category {name}"))),
                Err(error) => state.report(popup, &error),
            }
        });
}

fn confirm_delete(popup: &mut AppPopup, category: Category) {
    let message = format!("Are you sure you want to delete {}?", category.name);
    dialog::confirm(popup, "Delete Category", message, move |state, popup| {
        match state.inventory.delete_category(&category) {
            Ok(true) => state.toast(Toast::success(format!("Deleted {}", category.name))),
            Ok(false) => state.toast(Toast::error(format!("{} no longer exists", category.name))),
            Err(error) => state.report(popup, &error),
        }
    });
}
