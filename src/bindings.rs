use std::sync::Arc;

use crate::chart::{pie_chart, scatter_chart, ChartSpec};
use crate::data::aggregate::aggregate;
use crate::data::filter::filter_scatter;
use crate::data::model::{LaunchTable, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Controls, outputs and their current values
// ---------------------------------------------------------------------------

/// Input widgets whose value changes trigger handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    SiteDropdown,
    PayloadSlider,
}

/// Chart slots a handler renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputId {
    SuccessPie,
    PayloadScatter,
}

/// Snapshot of every control value, passed to each handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlValues {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

pub type Handler = fn(&LaunchTable, &ControlValues) -> ChartSpec;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Success pie for the selected site.
pub fn on_site_changed(table: &LaunchTable, site: &SiteSelection) -> ChartSpec {
    ChartSpec::Pie(pie_chart(&aggregate(table.records(), site)))
}

/// Payload/outcome scatter for the selected site and payload range.
pub fn on_site_or_range_changed(
    table: &LaunchTable,
    site: &SiteSelection,
    range: PayloadRange,
) -> ChartSpec {
    let selected = filter_scatter(table.records(), site, range.low, range.high);
    ChartSpec::Scatter(scatter_chart(site, &selected))
}

fn success_pie(table: &LaunchTable, values: &ControlValues) -> ChartSpec {
    on_site_changed(table, &values.site)
}

fn payload_scatter(table: &LaunchTable, values: &ControlValues) -> ChartSpec {
    on_site_or_range_changed(table, &values.site, values.payload)
}

// ---------------------------------------------------------------------------
// Binding table
// ---------------------------------------------------------------------------

pub struct Binding {
    pub output: OutputId,
    pub inputs: Vec<ControlId>,
    handler: Handler,
}

/// Maps control changes to the handlers that depend on them.
#[derive(Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` to render `output` whenever any of `inputs` changes.
    pub fn bind(&mut self, output: OutputId, inputs: &[ControlId], handler: Handler) -> &mut Self {
        self.bindings.push(Binding {
            output,
            inputs: inputs.to_vec(),
            handler,
        });
        self
    }

    /// The dashboard's two bindings.
    pub fn dashboard() -> Self {
        let mut table = Self::new();
        table
            .bind(OutputId::SuccessPie, &[ControlId::SiteDropdown], success_pie)
            .bind(
                OutputId::PayloadScatter,
                &[ControlId::SiteDropdown, ControlId::PayloadSlider],
                payload_scatter,
            );
        table
    }

    /// Run, in registration order, every handler bound to `changed`.
    pub fn dispatch(
        &self,
        changed: ControlId,
        data: &LaunchTable,
        values: &ControlValues,
    ) -> Vec<(OutputId, ChartSpec)> {
        log::debug!("dispatching {changed:?} with {values:?}");
        self.bindings
            .iter()
            .filter(|b| b.inputs.contains(&changed))
            .map(|b| (b.output, (b.handler)(data, values)))
            .collect()
    }

    /// Run every handler once, e.g. for the first paint.
    pub fn render_all(
        &self,
        data: &LaunchTable,
        values: &ControlValues,
    ) -> Vec<(OutputId, ChartSpec)> {
        self.bindings
            .iter()
            .map(|b| (b.output, (b.handler)(data, values)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dashboard – injected dataset + bindings
// ---------------------------------------------------------------------------

pub struct Dashboard {
    data: Arc<LaunchTable>,
    bindings: BindingTable,
}

impl Dashboard {
    pub fn new(data: Arc<LaunchTable>) -> Self {
        Dashboard {
            data,
            bindings: BindingTable::dashboard(),
        }
    }

    pub fn data(&self) -> &LaunchTable {
        &self.data
    }

    pub fn on_control_changed(
        &self,
        changed: ControlId,
        values: &ControlValues,
    ) -> Vec<(OutputId, ChartSpec)> {
        self.bindings.dispatch(changed, &self.data, values)
    }

    pub fn render_all(&self, values: &ControlValues) -> Vec<(OutputId, ChartSpec)> {
        self.bindings.render_all(&self.data, values)
    }
}
