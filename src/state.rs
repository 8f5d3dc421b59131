use std::sync::Arc;

use crate::bindings::{ControlId, ControlValues, Dashboard, OutputId};
use crate::chart::{ChartSpec, PieChart, ScatterChart};
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::scatter_indices;
use crate::data::model::{LaunchTable, PayloadBounds, PayloadRange, SiteSelection};
use crate::error::DashError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset and its bindings.
    pub dashboard: Dashboard,

    /// Current dropdown / slider values.
    pub controls: ControlValues,

    /// Observed payload extremes of the current dataset.
    pub bounds: PayloadBounds,

    /// Settings the slider limits are derived from on every (re)load.
    pub config: DashboardConfig,

    /// Slider limits: the configured range widened to the dataset bounds.
    pub slider_min: f64,
    pub slider_max: f64,
    pub slider_step: f64,

    /// Latest chart output for each slot.
    pub pie: Option<PieChart>,
    pub scatter: Option<ScatterChart>,

    /// Rows shown in the scatter (for the records table).
    pub visible_indices: Vec<usize>,

    /// Booster category colours for the scatter chart.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state for a freshly loaded table and paint every chart once.
    pub fn new(table: LaunchTable, config: &DashboardConfig) -> Result<Self, DashError> {
        let bounds = table.bounds()?;
        let color_map = ColorMap::new(table.booster_categories());
        let mut state = Self {
            dashboard: Dashboard::new(Arc::new(table)),
            controls: ControlValues {
                site: SiteSelection::All,
                payload: bounds.into(),
            },
            bounds,
            config: config.clone(),
            slider_min: config.slider_min.min(bounds.min),
            slider_max: config.slider_max.max(bounds.max),
            slider_step: config.slider_step,
            pie: None,
            scatter: None,
            visible_indices: Vec::new(),
            color_map,
            status_message: None,
        };
        let outputs = state.dashboard.render_all(&state.controls);
        state.apply(outputs);
        Ok(state)
    }

    /// Swap in a newly loaded dataset. On failure the current one is kept.
    pub fn replace_table(&mut self, table: LaunchTable) -> Result<(), DashError> {
        let config = self.config.clone();
        let site = self.controls.site.clone();
        *self = Self::new(table, &config)?;
        if site != SiteSelection::All {
            self.set_site(site);
        }
        Ok(())
    }

    pub fn set_site(&mut self, site: SiteSelection) {
        if self.controls.site == site {
            return;
        }
        self.controls.site = site;
        self.control_changed(ControlId::SiteDropdown);
    }

    pub fn set_payload_range(&mut self, range: PayloadRange) {
        if self.controls.payload == range {
            return;
        }
        self.controls.payload = range;
        self.control_changed(ControlId::PayloadSlider);
    }

    /// Restore the slider to the dataset's payload bounds.
    pub fn reset_payload_range(&mut self) {
        self.set_payload_range(self.bounds.into());
    }

    pub fn data(&self) -> &LaunchTable {
        self.dashboard.data()
    }

    fn control_changed(&mut self, control: ControlId) {
        let outputs = self.dashboard.on_control_changed(control, &self.controls);
        self.apply(outputs);
    }

    fn apply(&mut self, outputs: Vec<(OutputId, ChartSpec)>) {
        for (output, spec) in outputs {
            match (output, spec) {
                (OutputId::SuccessPie, ChartSpec::Pie(pie)) => self.pie = Some(pie),
                (OutputId::PayloadScatter, ChartSpec::Scatter(scatter)) => {
                    self.scatter = Some(scatter);
                    self.visible_indices = scatter_indices(
                        self.dashboard.data().records(),
                        &self.controls.site,
                        self.controls.payload,
                    );
                }
                (output, spec) => {
                    log::warn!("ignoring mismatched chart for {output:?}: {spec:?}")
                }
            }
        }
    }
}
