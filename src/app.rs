use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, pie, plot, table};

pub const DASHBOARD_TITLE: &str = "SpaceX Launch Records Dashboard";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(
                            RichText::new(DASHBOARD_TITLE)
                                .size(40.0)
                                .color(Color32::from_rgb(0x50, 0x3D, 0x36)),
                        );
                    });
                    ui.add_space(12.0);

                    if let Some(chart) = &self.state.pie {
                        pie::pie_chart(ui, chart);
                    }
                    ui.add_space(12.0);
                    ui.separator();

                    plot::scatter_plot(ui, &self.state);
                    ui.add_space(8.0);

                    egui::CollapsingHeader::new("Launch records")
                        .default_open(false)
                        .show(ui, |ui: &mut Ui| {
                            table::records_table(ui, &self.state);
                        });
                });
        });
    }
}
