use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const HEADERS: [&str; 6] = [
    "Flight",
    "Launch Site",
    "Payload Mass (kg)",
    "class",
    "Booster Version",
    "Booster Version Category",
];

/// Rows currently plotted in the scatter chart.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let records = state.data().records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(240.0)
        .columns(Column::auto(), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let rec = &records[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(rec.flight_number.map(|n| n.to_string()).unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(rec.launch_site.as_str());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", rec.payload_mass_kg));
                });
                row.col(|ui| {
                    ui.label(rec.outcome.to_string());
                });
                row.col(|ui| {
                    ui.label(rec.booster_version.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    let category = rec.booster_version_category.as_str();
                    ui.colored_label(state.color_map.color_for(category), category);
                });
            });
        });
}
