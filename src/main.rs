mod app;
mod bindings;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::Path;

use anyhow::anyhow;
use app::{LaunchDashApp, DASHBOARD_TITLE};
use config::{DashboardConfig, CONFIG_FILE};
use data::aggregate::{best_success_ratio, success_ratios};
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let table = data::loader::load_file(&config.dataset_path)?;
    log::info!(
        "Loaded {} launches from {} ({} sites)",
        table.len(),
        config.dataset_path.display(),
        table.sites().len()
    );

    for ratio in success_ratios(table.records()) {
        log::debug!(
            "{}: {}/{} successful launches",
            ratio.site,
            ratio.successes,
            ratio.attempts
        );
    }
    match best_success_ratio(table.records()) {
        Some(best) => println!("{}", best.report_line()),
        None => log::warn!("No launches loaded; success ratio report skipped"),
    }

    let state = AppState::new(table, &config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        DASHBOARD_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
