use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::epaint::Mesh;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};

use crate::chart::PieChart;
use crate::color::generate_palette;

const PIE_SIZE: f32 = 260.0;

/// Render a pie chart with its legend to the right.
pub fn pie_chart(ui: &mut Ui, chart: &PieChart) {
    ui.label(RichText::new(&chart.title).strong().size(18.0));

    if chart.total() == 0 {
        ui.label("No successful launches to show.");
        return;
    }

    let colors = generate_palette(chart.slices.len());

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(PIE_SIZE), Sense::hover());
        let center = response.rect.center();
        let radius = PIE_SIZE * 0.45;

        // Start at 12 o'clock and go clockwise.
        let mut start = -FRAC_PI_2;
        let mut edges = Vec::new();
        for (i, color) in colors.iter().enumerate() {
            let sweep = chart.fraction(i) as f32 * TAU;
            if sweep <= 0.0 {
                continue;
            }
            paint_wedge(&painter, center, radius, start, start + sweep, *color);
            edges.push(start);

            let label_pos = center + Vec2::angled(start + sweep / 2.0) * radius * 0.65;
            painter.text(
                label_pos,
                Align2::CENTER_CENTER,
                chart.slice_text(i),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
            start += sweep;
        }

        // Slice borders, skipped for a single full circle.
        if edges.len() > 1 {
            let stroke = Stroke::new(1.5, ui.visuals().panel_fill);
            for angle in edges {
                painter.line_segment([center, center + Vec2::angled(angle) * radius], stroke);
            }
        }

        ui.vertical(|ui: &mut Ui| {
            for (slice, color) in chart.slices.iter().zip(&colors) {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, painter) = ui.allocate_painter(Vec2::splat(12.0), Sense::hover());
                    painter.rect_filled(swatch.rect, 2.0, *color);
                    ui.label(format!("{}  ({})", slice.label, slice.value));
                });
            }
        });
    });
}

/// Fill the circular sector between `from` and `to` (radians).
fn paint_wedge(painter: &Painter, center: Pos2, radius: f32, from: f32, to: f32, color: Color32) {
    let steps = (((to - from) / TAU) * 128.0).ceil().max(1.0) as u32;

    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for k in 0..=steps {
        let angle = from + (to - from) * k as f32 / steps as f32;
        mesh.colored_vertex(center + Vec2::angled(angle) * radius, color);
    }
    for k in 1..=steps {
        mesh.add_triangle(0, k, k + 1);
    }
    painter.add(Shape::mesh(mesh));
}
