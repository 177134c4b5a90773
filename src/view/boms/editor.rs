//! Add/edit popup for BOMs, with a fuzzy item picker.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dialog::{self, AppPopup, INVALID_FIELDS};
use crate::model::{Bom, Item, ItemReference};
use crate::search::Matcher;
use crate::ui::{Toast, Ui};

/// Picker rows shown at once; refine the search to reach the rest.
const PICKER_ROWS: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct BomForm {
    name: String,
    /// Index of the output item.
    output: usize,
    output_quantity: String,
    search: String,
    only_selected: bool,
    /// Selected component ids and their quantity text, in selection order.
    selected: Vec<(String, String)>,
}

impl BomForm {
    pub fn new() -> Self {
        Self {
            output_quantity: "1".to_string(),
            ..Self::default()
        }
    }

    pub fn from_bom(bom: &Bom, items: &[Item]) -> Self {
        let mut references = bom.items.clone();
        references.sort_by_key(|reference| reference.position);
        Self {
            name: bom.name.clone(),
            output: items
                .iter()
                .position(|item| item.id == bom.output.id)
                .unwrap_or(0),
            output_quantity: bom.output.quantity.to_string(),
            search: String::new(),
            only_selected: false,
            selected: references
                .into_iter()
                .map(|reference| (reference.id, reference.quantity.to_string()))
                .collect(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.selected.iter().position(|(selected, _)| selected == id)
    }

    fn toggle(&mut self, id: &str) {
        match self.position(id) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push((id.to_string(), "1".to_string())),
        }
    }

    fn draw(&mut self, ui: &mut Ui, items: &[Item], output_ids: &[String], matcher: &Matcher) {
        ui.text_input("Name", &mut self.name, false);
        ui.selector("Output item", output_ids, &mut self.output);
        ui.text_input("Output quantity", &mut self.output_quantity, false);
        ui.separator();
        ui.text_input("Search", &mut self.search, false);
        ui.checkbox("Only show selected items", &mut self.only_selected);

        let matches: Vec<&Item> = matcher
            .rank(items, &self.search)
            .into_iter()
            .map(|index| &items[index])
            .filter(|item| !self.only_selected || self.position(&item.id).is_some())
            .collect();

        for item in matches.iter().take(PICKER_ROWS) {
            let mut checked = self.position(&item.id).is_some();
            if ui.checkbox(&format!("{} {}", item.id, item.description), &mut checked) {
                self.toggle(&item.id);
            }
            if let Some(index) = self.position(&item.id) {
                ui.same_line();
                let unit = if item.unit.is_empty() { "qty" } else { item.unit.as_str() };
                let label = format!("  {unit}");
                ui.text_input(&label, &mut self.selected[index].1, false);
            }
        }
        if matches.len() > PICKER_ROWS {
            let muted = ui.theme().overlay0();
            ui.text_colored(&format!("{} more...", matches.len() - PICKER_ROWS), muted);
        }
    }

    /// The BOM described by the form, or `None` when a field is invalid.
    fn build(&self, id: String, output_ids: &[String]) -> Option<Bom> {
        let output_id = output_ids.get(self.output)?;
        let output = ItemReference::new(output_id.clone(), parse_positive(&self.output_quantity)?, 0);

        let items = self
            .selected
            .iter()
            .enumerate()
            .map(|(position, (id, quantity))| {
                Some(ItemReference::new(
                    id.clone(),
                    parse_positive(quantity)?,
                    i32::try_from(position).ok()?,
                ))
            })
            .collect::<Option<Vec<_>>>()?;
        if items.is_empty() || items.iter().any(|reference| reference.id == output.id) {
            return None;
        }

        let bom = Bom {
            id,
            name: self.name.trim().to_string(),
            items,
            output,
        };
        bom.is_valid().then_some(bom)
    }
}

fn parse_positive(text: &str) -> Option<f32> {
    text.trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}

pub fn open(
    popup: &mut AppPopup,
    original: Option<Bom>,
    form: BomForm,
    items: Vec<Item>,
    notice: Option<&str>,
) {
    let title = if original.is_some() { "Edit BOM" } else { "Add BOM" };
    let output_ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
    let form = Rc::new(RefCell::new(form));
    let fields = Rc::clone(&form);
    let picker_items = items.clone();
    let picker_ids = output_ids.clone();
    let matcher = Matcher::default();

    let session = popup.open(title).size(70, 80);
    if let Some(notice) = notice {
        session.text_styled(notice, dialog::ALERT_STYLE, true).spacing();
    }
    session
        .action(move |ui, _| {
            fields
                .borrow_mut()
                .draw(ui, &picker_items, &picker_ids, &matcher);
        })
        .spacing()
        .button("Save", move |state, popup| {
            let form = form.take();
            let id = original
                .as_ref()
                .map_or_else(|| state.inventory.new_bom_id(), |bom| Some(bom.id.clone()));
            let Some(id) = id else {
                dialog::error(popup, "No free BOM ID left");
                return;
            };
            let Some(bom) = form.build(id, &output_ids) else {
                open(popup, original, form, items, Some(INVALID_FIELDS));
                return;
            };
            let name = bom.name.clone();
            let result = match &original {
                Some(old) => state.inventory.edit_bom(old, bom).map(|_| ()),
                None => state.inventory.add_bom(bom),
            };
            match result {
                Ok(()) => state.toast(Toast::success(format!("Saved {name}"))),
                Err(error) => state.report(popup, &error),
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;
    use crate::app::AppState;
    use crate::dialog::testing::{frame, press, tab, type_text};
    use crate::ui::UiInput;

    #[test]
    fn test_from_bom_keeps_positions() {
        let state = AppState::demo(None);
        let items = state.inventory.items().all();
        let mut bom = state.inventory.boms().find("BOM1").unwrap().clone();
        bom.items.reverse();

        let form = BomForm::from_bom(&bom, items);
        let ids: Vec<&str> = form.selected.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["R0", "C0", "CON0A"]);
        assert_eq!(items[form.output].id, "CON1A");
    }

    #[test]
    fn test_build_rejects_bad_quantities() {
        let ids = vec!["R0".to_string(), "C0".to_string()];
        let mut form = BomForm::new();
        form.name = "Divider".into();
        form.output = 1;
        form.toggle("R0");
        assert!(form.build("BOM2".into(), &ids).is_some());

        form.selected[0].1 = "0".into();
        assert!(form.build("BOM2".into(), &ids).is_none());

        form.selected[0].1 = "2".into();
        form.toggle("C0");
        assert!(form.build("BOM2".into(), &ids).is_none(), "output used as component");
    }

    #[test]
    fn test_add_bom_with_picker() {
        let mut state = AppState::demo(Some("admin"));
        let mut popup = AppPopup::new();
        let mut ui = Ui::new(Theme::default());
        let items = state.inventory.items().all().to_vec();

        open(&mut popup, None, BomForm::new(), items, None);
        frame(&mut popup, &mut ui, &mut state);
        type_text(&mut popup, &mut ui, &mut state, "Cable");
        tab(&mut popup, &mut ui, &mut state, 3);
        type_text(&mut popup, &mut ui, &mut state, "con0");
        let text = frame(&mut popup, &mut ui, &mut state).unwrap();
        assert!(text.contains("CON0A"));
        assert!(!text.contains("[ ] R1"));

        tab(&mut popup, &mut ui, &mut state, 2);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);
        tab(&mut popup, &mut ui, &mut state, 2);
        press(&mut popup, &mut ui, &mut state, &[UiInput::Activate]);

        assert!(!popup.is_open());
        let bom = state.inventory.boms().find("BOM2").unwrap();
        assert_eq!(bom.name, "Cable");
        assert_eq!(bom.output.id, "R0");
        assert_eq!(bom.items, vec![ItemReference::new("CON0A", 1.0, 0)]);
    }
}
