use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::Parameter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("No measurements loaded.");
        return;
    }

    // ---- Device ----
    ui.strong("Device");
    let devices: Vec<String> = state.dataset.devices().iter().map(str::to_owned).collect();
    let current_device = state.selection.device_id.clone();
    let mut picked_device = None;
    egui::ComboBox::from_id_salt("device")
        .width(ui.available_width())
        .selected_text(current_device.as_deref().unwrap_or("Select a Greenhouse"))
        .show_ui(ui, |ui: &mut Ui| {
            for dev in &devices {
                if ui
                    .selectable_label(current_device.as_ref() == Some(dev), dev)
                    .clicked()
                {
                    picked_device = Some(dev.clone());
                }
            }
        });
    if picked_device.is_some() && picked_device != current_device {
        state.set_device(picked_device);
    }
    ui.add_space(6.0);

    // ---- Parameter ----
    ui.strong("Parameter");
    let current_param = state.selected_parameter();
    let mut picked_param = None;
    egui::ComboBox::from_id_salt("parameter")
        .width(ui.available_width())
        .selected_text(current_param.map_or("Select a Parameter", Parameter::label))
        .show_ui(ui, |ui: &mut Ui| {
            for p in Parameter::ALL {
                if ui.selectable_label(current_param == Some(p), p.label()).clicked() {
                    picked_param = Some(p);
                }
            }
        });
    if picked_param.is_some() && picked_param != current_param {
        state.set_parameter(picked_param);
    }
    ui.add_space(6.0);

    // ---- Date range ----
    ui.strong("Date range");
    if let Some((first, last)) = state.dataset.date_bounds() {
        ui.label(
            RichText::new(format!("data covers {first} – {last}"))
                .small()
                .weak(),
        );
    }

    let start_default = state.default_date(false);
    if let Some(change) = date_row(ui, "From", state.selection.start_date, start_default, "start") {
        state.set_start_date(change);
    }
    let end_default = state.default_date(true);
    if let Some(change) = date_row(ui, "To", state.selection.end_date, end_default, "end") {
        state.set_end_date(change);
    }

    if let (Some(start), Some(end)) = (state.selection.start_date, state.selection.end_date) {
        if start > end {
            ui.label(RichText::new("Start is after end").color(Color32::YELLOW));
        }
    }

    ui.separator();
    if !state.selection.is_complete() {
        ui.label(RichText::new("Complete the selection to plot").small().weak());
    }
    if ui.button("Reset").clicked() {
        state.reset();
    }
}

/// A toggle plus date picker. Returns `Some(new_value)` when the user changed it.
fn date_row(
    ui: &mut Ui,
    label: &str,
    current: Option<NaiveDate>,
    default: NaiveDate,
    id_salt: &str,
) -> Option<Option<NaiveDate>> {
    let mut change = None;
    ui.horizontal(|ui: &mut Ui| {
        let mut enabled = current.is_some();
        if ui.checkbox(&mut enabled, label).changed() {
            change = Some(enabled.then_some(default));
        }
        if let Some(mut date) = current {
            let response = ui.add(
                DatePickerButton::new(&mut date)
                    .id_salt(id_salt)
                    .format("%b %e, %Y"),
            );
            if response.changed() && Some(date) != current {
                change = Some(Some(date));
            }
        }
    });
    change
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(format!(
            "{} measurements from {} device(s)",
            state.dataset.len(),
            state.dataset.devices().len()
        ));

        if let Some(series) = &state.series {
            ui.separator();
            ui.label(format!("{} point(s) shown", series.points.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
