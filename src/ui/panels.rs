use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::{PayloadRange, SiteSelection, ALL_SITES, KNOWN_SITES};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – controls
// ---------------------------------------------------------------------------

/// Render the site dropdown and the payload range sliders.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    // ---- Launch site dropdown ----
    ui.strong("Launch Site");
    let options: Vec<SiteSelection> = std::iter::once(ALL_SITES)
        .chain(KNOWN_SITES)
        .map(SiteSelection::parse)
        .collect();

    let mut chosen: Option<SiteSelection> = None;
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(state.controls.site.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &options {
                if ui
                    .selectable_label(state.controls.site == *option, option.label())
                    .clicked()
                {
                    chosen = Some(option.clone());
                }
            }
        });
    if let Some(site) = chosen {
        state.set_site(site);
    }
    ui.add_space(8.0);
    ui.separator();

    // ---- Payload range ----
    ui.strong("Payload range (Kg):");
    let mut low = state.controls.payload.low;
    let mut high = state.controls.payload.high;
    let limits = state.slider_min..=state.slider_max;
    ui.add(
        egui::Slider::new(&mut low, limits.clone())
            .step_by(state.slider_step)
            .text("From"),
    );
    ui.add(
        egui::Slider::new(&mut high, limits)
            .step_by(state.slider_step)
            .text("To"),
    );
    state.set_payload_range(PayloadRange::new(low, high));

    if low > high {
        ui.label(RichText::new("Lower bound exceeds upper bound").color(Color32::YELLOW));
    }
    if ui.small_button("Reset").clicked() {
        state.reset_payload_range();
    }
    ui.label(format!(
        "Dataset payloads: {:.0} – {:.0} kg",
        state.bounds.min, state.bounds.max
    ));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let plotted = state.scatter.as_ref().map_or(0, |chart| chart.point_count());
        ui.label(format!(
            "{} launches loaded, {} in scatter",
            state.data().len(),
            plotted
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    let Some(path) = file else {
        return;
    };

    let result = crate::data::loader::load_file(&path).and_then(|table| {
        log::info!(
            "Loaded {} launches from {} sites",
            table.len(),
            table.sites().len()
        );
        state.replace_table(table)
    });
    if let Err(e) = result {
        let e = anyhow::Error::new(e);
        log::error!("Failed to load file: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
