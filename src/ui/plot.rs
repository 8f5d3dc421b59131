use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter
// ---------------------------------------------------------------------------

/// Render the scatter chart, one coloured series per booster category.
pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.scatter else {
        return;
    };

    ui.label(RichText::new(&chart.title).strong().size(18.0));
    if chart.series.is_empty() {
        ui.label("No launches match the current site and payload range.");
    }

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .include_x(state.controls.payload.low.min(state.controls.payload.high))
        .include_x(state.controls.payload.high.max(state.controls.payload.low))
        .include_y(-0.2)
        .include_y(1.2)
        .height(320.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                let color = state.color_map.color_for(&series.category);

                plot_ui.points(
                    Points::new(points)
                        .name(&series.category)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}
