mod editor;
mod make;

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::Cell;

use super::{View, require_write};
use crate::Theme;
use crate::app::AppState;
use crate::config::{BomAction, KeyResolver};
use crate::dialog::{self, AppPopup};
use crate::export;
use crate::filter::Filterable;
use crate::inventory::Inventory;
use crate::model::Bom;
use crate::ui::{Component, Handled, Keybinding, Result, Table, TableEvent, TableRow, Toast};

use editor::BomForm;

impl TableRow for Bom {
    fn widths() -> &'static [Constraint] {
        &[Constraint::Length(10), Constraint::Min(24), Constraint::Length(14)]
    }

    fn render_cells(&self, _theme: &Theme) -> Vec<Cell<'static>> {
        (0..Self::COLUMNS.len())
            .map(|column| Cell::from(self.column_text(column)))
            .collect()
    }
}

pub struct BomsView {
    table: Table<Bom>,
    resolver: Arc<KeyResolver>,
}

impl BomsView {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            table: Table::new("BOMs", Arc::clone(&resolver)),
            resolver,
        }
    }

    fn add(state: &AppState, popup: &mut AppPopup) {
        if require_write(state, popup) {
            let items = state.inventory.items().all().to_vec();
            editor::open(popup, None, BomForm::new(), items, None);
        }
    }

    fn edit(bom: Bom, state: &AppState, popup: &mut AppPopup) {
        if require_write(state, popup) {
            let items = state.inventory.items().all().to_vec();
            let form = BomForm::from_bom(&bom, &items);
            editor::open(popup, Some(bom), form, items, None);
        }
    }

    fn delete(bom: Bom, state: &AppState, popup: &mut AppPopup) {
        if !require_write(state, popup) {
            return;
        }
        let message = format!("Are you sure you want to delete {}?", bom.name);
        dialog::confirm(popup, "Delete BOM", message, move |state, popup| {
            match state.inventory.delete_bom(&bom) {
                Ok(true) => state.toast(Toast::success(format!("Deleted {}", bom.id))),
                Ok(false) => state.toast(Toast::error(format!("{} no longer exists", bom.id))),
                Err(error) => state.report(popup, &error),
            }
        });
    }
}

impl View for BomsView {
    fn sync(&mut self, state: &AppState) {
        let boms = state.inventory.boms().all();
        if self.table.items() != boms {
            self.table.set_items(boms.to_vec());
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
        if r.matches_boms(&key, BomAction::Add) {
            Self::add(state, popup);
        } else if r.matches_boms(&key, BomAction::Edit) {
            if let Some(bom) = selected {
                Self::edit(bom, state, popup);
            }
        } else if r.matches_boms(&key, BomAction::Delete) {
            if let Some(bom) = selected {
                Self::delete(bom, state, popup);
            }
        } else if r.matches_boms(&key, BomAction::Make) {
            if let Some(bom) = selected {
                if require_write(state, popup) {
                    make::open(popup, bom);
                }
            }
        } else if r.matches_boms(&key, BomAction::Export) {
            export_boms(state, popup, &self.table.visible_rows(), 1);
        } else {
            return Ok(match self.table.handle_key(key)? {
                Handled::Event(TableEvent::Activated(bom)) => {
                    Self::edit(bom, state, popup);
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
        Keybinding::hint(r.display_boms(BomAction::Add), "Add"),
        Keybinding::hint(r.display_boms(BomAction::Edit), "Edit"),
        Keybinding::hint(r.display_boms(BomAction::Delete), "Delete"),
        Keybinding::hint(r.display_boms(BomAction::Make), "Make"),
        Keybinding::new(r.display_boms(BomAction::Export), "Export CSV"),
    ]
}

fn unit_of(inventory: &Inventory, id: &str) -> String {
    inventory
        .items()
        .get_by_id(id)
        .map(|item| item.unit.clone())
        .unwrap_or_default()
}

/// Export `boms` with component quantities for `count` builds.
fn export_boms(state: &AppState, popup: &mut AppPopup, boms: &[Bom], count: u32) {
    let dir = state.config.resolved_export_dir();
    match export::export_boms(&dir, boms, count, |id| unit_of(&state.inventory, id)) {
        Ok(path) => dialog::file_generated(popup, path),
        Err(error) => {
            tracing::error!("BOM export failed: {error:#}");
            dialog::error(popup, &format!("Export failed: {error}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::testing::{frame, press};
    use crate::ui::{Ui, UiInput};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_make_requires_write() {
        let mut state = AppState::demo(None);
        let mut view = BomsView::new(Arc::clone(&state.resolver));
        let mut popup = AppPopup::new();
        view.sync(&state);

        view.handle_key(key('b'), &mut state, &mut popup).unwrap();
        assert_eq!(popup.title(), Some("Unauthorized"));
    }

    #[test]
    fn test_delete_bom() {
        let mut state = AppState::demo(Some("admin"));
        let mut view = BomsView::new(Arc::clone(&state.resolver));
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        view.sync(&state);

        view.handle_key(key('d'), &mut state, &mut popup).unwrap();
        assert_eq!(popup.title(), Some("Delete BOM"));
        frame(&mut popup, &mut ui, &mut state);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);
        assert!(state.inventory.boms().all().is_empty());
    }

    #[test]
    fn test_export_writes_units() {
        let mut state = AppState::demo(None);
        let dir = tempfile::tempdir().unwrap();
        state.config.export_dir = Some(dir.path().to_path_buf());
        let mut view = BomsView::new(Arc::clone(&state.resolver));
        let mut popup = AppPopup::new();
        view.sync(&state);

        view.handle_key(key('x'), &mut state, &mut popup).unwrap();
        assert_eq!(popup.title(), Some("File Generated"));
        let file = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("R0:\t4 pcs"));
    }
}
