//! "Make" popup: consume components and stock the output of a BOM.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dialog::AppPopup;
use crate::inventory::Requirement;
use crate::model::Bom;
use crate::ui::{Toast, Ui};

/// Build count typed by the user, at least one.
fn parse_count(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|count| *count >= 1)
}

fn draw_requirements(ui: &mut Ui, requirements: &[Requirement]) {
    let header = ui.theme().subtext0();
    ui.text_colored(
        &format!("{:<12} {:>10} {:>10}  {}", "Item", "Needed", "Available", "Unit"),
        header,
    );
    for requirement in requirements {
        let color = if requirement.is_short() {
            ui.theme().red()
        } else {
            ui.theme().text()
        };
        ui.text_colored(
            &format!(
                "{:<12} {:>10} {:>10}  {}",
                requirement.id, requirement.needed, requirement.available, requirement.unit
            ),
            color,
        );
    }
}

pub fn open(popup: &mut AppPopup, bom: Bom) {
    let count = Rc::new(RefCell::new(String::from("1")));
    let (input, gate, on_make, on_export) = (
        Rc::clone(&count),
        Rc::clone(&count),
        Rc::clone(&count),
        count,
    );
    let (shown, checked, made, exported) = (bom.clone(), bom.clone(), bom.clone(), bom);

    popup
        .open("Make")
        .size(70, 70)
        .hide_close()
        .action(move |ui, state| {
            let mut text = input.borrow_mut();
            let count = parse_count(&text);
            let question = count.map_or_else(
                || format!("Make {}?", shown.name),
                |count| format!("Make {count} {}?", shown.name),
            );
            ui.text_styled(&question, "Bold", true);
            ui.spacing();
            ui.text_input("Quantity to make", &mut text, false);
            ui.spacing();
            draw_requirements(ui, &state.inventory.requirements(&shown, count.unwrap_or(1)));
        })
        .spacing()
        .committing(
            "Make",
            move |ui, state, label| {
                let count = parse_count(&gate.borrow());
                let ready = count.is_some_and(|count| {
                    !state
                        .inventory
                        .requirements(&checked, count)
                        .iter()
                        .any(Requirement::is_short)
                });
                let label = count.map_or_else(|| label.to_string(), |count| format!("{label} ({count})"));
                ui.button_enabled(&label, ready)
            },
            move |state, popup| {
                let count = parse_count(&on_make.borrow()).unwrap_or(1);
                match state.inventory.make(&made, count) {
                    Ok(()) => state.toast(Toast::success(format!("Made {count} x {}", made.name))),
                    Err(error) => state.report(popup, &error),
                }
            },
        )
        .same_line()
        .committing("Cancel", |ui, _, label| ui.button(label) || ui.close_requested(), |_, _| {})
        .same_line()
        .button("Export", move |state, popup| {
            let count = parse_count(&on_export.borrow()).unwrap_or(1);
            super::export_boms(state, popup, std::slice::from_ref(&exported), count);
        });
}
