//! Chart Plotter Module
//! Draws chart specifications with egui_plot.

use crate::charts::spec::{ChartSpec, ColorScale, HeatmapChart, ScatterChart, SeriesChart, XAxis};
use crate::stats::{Summary, SUMMARY_ROWS};
use egui::{Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon};
use std::collections::BTreeMap;

/// Color palette for series, in assignment order.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const MIN_MARKER_RADIUS: f32 = 2.0;
const MAX_MARKER_RADIUS: f32 = 14.0;
const BAR_GROUP_FILL: f64 = 0.8;

/// Creates interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the n-th series.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Marker radius for a scatter point, area-proportional to `size`.
    ///
    /// Snapped to half pixels so points can be batched per radius.
    pub fn marker_radius(size: f64, max_size: f64) -> f32 {
        if max_size <= 0.0 || !size.is_finite() {
            return MIN_MARKER_RADIUS;
        }
        let ratio = (size / max_size).clamp(0.0, 1.0).sqrt() as f32;
        let radius = MIN_MARKER_RADIUS + (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS) * ratio;
        (radius * 2.0).round() / 2.0
    }

    /// Bar width and per-group center offsets for grouped bars.
    pub fn bar_layout(groups: usize, spacing: f64) -> (f64, Vec<f64>) {
        let groups = groups.max(1);
        let width = spacing * BAR_GROUP_FILL / groups as f64;
        let offsets = (0..groups)
            .map(|g| (g as f64 - (groups - 1) as f64 / 2.0) * width)
            .collect();
        (width, offsets)
    }

    /// Smallest gap between distinct x positions, 1.0 when undefined.
    fn min_spacing(chart: &SeriesChart) -> f64 {
        let mut xs: Vec<f64> = chart
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p[0]))
            .collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        xs.dedup();
        xs.windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
            .unwrap_or(1.0)
    }

    /// Draw any chart kind.
    pub fn draw(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        ui.label(RichText::new(spec.title()).size(16.0).strong());
        ui.add_space(6.0);

        match spec {
            ChartSpec::Line { chart, markers } => Self::draw_line_chart(ui, chart, *markers, height),
            ChartSpec::Bar { chart, .. } => Self::draw_bar_chart(ui, chart, height),
            ChartSpec::Scatter(chart) => Self::draw_scatter_chart(ui, chart, height),
            ChartSpec::Heatmap(chart) => Self::draw_heatmap(ui, chart, height),
        }
    }

    fn draw_line_chart(ui: &mut egui::Ui, chart: &SeriesChart, markers: bool, height: f32) {
        let axis = chart.x_axis.clone();
        let mut plot = Plot::new("line_chart")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone());
        if matches!(axis, XAxis::Categorical(_)) {
            plot = plot.x_axis_formatter(move |mark, _range| {
                axis.label_at(mark.value).unwrap_or_default()
            });
        }

        plot.show(ui, |plot_ui| {
            for (i, series) in chart.series.iter().enumerate() {
                let color = Self::series_color(i);
                let name = series.name.clone().unwrap_or_else(|| chart.y_label.clone());

                plot_ui.line(
                    Line::new(PlotPoints::new(series.points.clone()))
                        .color(color)
                        .width(2.0)
                        .name(&name),
                );

                if markers {
                    plot_ui.points(
                        Points::new(PlotPoints::new(series.points.clone()))
                            .radius(3.5)
                            .color(color)
                            .name(&name),
                    );
                }
            }
        });
    }

    fn draw_bar_chart(ui: &mut egui::Ui, chart: &SeriesChart, height: f32) {
        let (bar_width, offsets) = Self::bar_layout(chart.series.len(), Self::min_spacing(chart));

        let axis = chart.x_axis.clone();
        let mut plot = Plot::new("bar_chart")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone());
        if matches!(axis, XAxis::Categorical(_)) {
            plot = plot.x_axis_formatter(move |mark, _range| {
                axis.label_at(mark.value).unwrap_or_default()
            });
        }

        plot.show(ui, |plot_ui| {
            for (i, series) in chart.series.iter().enumerate() {
                let color = Self::series_color(i);
                let name = series.name.clone().unwrap_or_else(|| chart.y_label.clone());
                let bars: Vec<Bar> = series
                    .points
                    .iter()
                    .map(|&[x, y]| Bar::new(x + offsets[i], y).width(bar_width))
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).color(color).name(&name));
            }
        });
    }

    fn draw_scatter_chart(ui: &mut egui::Ui, chart: &ScatterChart, height: f32) {
        let axis = chart.x_axis.clone();
        let mut plot = Plot::new("scatter_chart")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone());
        if matches!(axis, XAxis::Categorical(_)) {
            plot = plot.x_axis_formatter(move |mark, _range| {
                axis.label_at(mark.value).unwrap_or_default()
            });
        }

        plot.show(ui, |plot_ui| {
            for (i, series) in chart.series.iter().enumerate() {
                let series_color = Self::series_color(i);
                let name = series.name.clone().unwrap_or_else(|| chart.y_label.clone());

                // Points items share one radius and color, so batch by both.
                let mut batches: BTreeMap<(u32, [u8; 3]), Vec<[f64; 2]>> = BTreeMap::new();
                for p in &series.points {
                    let radius = Self::marker_radius(p.size, chart.max_size);
                    let rgb = match (p.shade, chart.shade_range) {
                        (Some(v), Some(range)) => chart.color_scale.color_for(v, range),
                        _ => [series_color.r(), series_color.g(), series_color.b()],
                    };
                    batches
                        .entry(((radius * 2.0) as u32, rgb))
                        .or_default()
                        .push([p.x, p.y]);
                }

                for ((half_px, [r, g, b]), points) in batches {
                    plot_ui.points(
                        Points::new(PlotPoints::new(points))
                            .radius(half_px as f32 / 2.0)
                            .color(Color32::from_rgb(r, g, b).gamma_multiply(0.8))
                            .name(&name),
                    );
                }
            }
        });

        if let Some(range) = chart.shade_range {
            let caption = chart.color_label.clone().unwrap_or_default();
            Self::draw_color_bar(ui, chart.color_scale, range, &caption);
        }
    }

    fn draw_heatmap(ui: &mut egui::Ui, chart: &HeatmapChart, height: f32) {
        let pivot = &chart.pivot;
        if pivot.is_empty() {
            ui.label("표시할 값이 없습니다.");
            return;
        }

        let (n_rows, n_cols) = pivot.shape();
        let range = pivot.value_range().unwrap_or((0.0, 1.0));

        // First row on top.
        let row_y = move |r: usize| (n_rows - 1 - r) as f64;
        let x_axis = XAxis::Categorical(pivot.col_keys.clone());
        let y_axis = XAxis::Categorical(pivot.row_keys.iter().rev().cloned().collect());
        let hover_pivot = pivot.clone();

        Plot::new("heatmap")
            .height(height)
            .allow_scroll(false)
            .show_grid(false)
            .x_axis_label(pivot.columns_name.clone())
            .y_axis_label(pivot.index_name.clone())
            .x_axis_formatter(move |mark, _range| x_axis.label_at(mark.value).unwrap_or_default())
            .y_axis_formatter(move |mark, _range| y_axis.label_at(mark.value).unwrap_or_default())
            .label_formatter(move |_name, point: &PlotPoint| {
                let c = point.x.round();
                let r = (n_rows as f64 - 1.0) - point.y.round();
                if c < 0.0 || r < 0.0 || c >= n_cols as f64 || r >= n_rows as f64 {
                    return String::new();
                }
                let (r, c) = (r as usize, c as usize);
                let value = hover_pivot
                    .cell(r, c)
                    .map(|v| format!("{:.3}", v))
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{}: {}\n{}: {}\n{}: {}",
                    hover_pivot.index_name,
                    hover_pivot.row_keys[r],
                    hover_pivot.columns_name,
                    hover_pivot.col_keys[c],
                    hover_pivot.values_name,
                    value
                )
            })
            .show(ui, |plot_ui| {
                for r in 0..n_rows {
                    for c in 0..n_cols {
                        let Some(value) = pivot.cell(r, c) else {
                            continue;
                        };
                        let [red, green, blue] = chart.color_scale.color_for(value, range);
                        let (x, y) = (c as f64, row_y(r));
                        let cell = vec![
                            [x - 0.5, y - 0.5],
                            [x + 0.5, y - 0.5],
                            [x + 0.5, y + 0.5],
                            [x - 0.5, y + 0.5],
                        ];
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::new(cell))
                                .fill_color(Color32::from_rgb(red, green, blue))
                                .stroke(Stroke::NONE),
                        );
                    }
                }
            });

        Self::draw_color_bar(
            ui,
            chart.color_scale,
            range,
            &format!("mean({})", chart.pivot.values_name),
        );
    }

    /// Horizontal gradient legend with the value range.
    fn draw_color_bar(ui: &mut egui::Ui, scale: ColorScale, (lo, hi): (f64, f64), caption: &str) {
        const STEPS: usize = 64;

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{:.2}", lo)).size(11.0));
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(240.0, 12.0), egui::Sense::hover());
            let step_w = rect.width() / STEPS as f32;
            for i in 0..STEPS {
                let [r, g, b] = scale.sample(i as f64 / (STEPS - 1) as f64);
                let min = egui::pos2(rect.left() + i as f32 * step_w, rect.top());
                let max = egui::pos2(min.x + step_w + 0.5, rect.bottom());
                ui.painter().rect_filled(
                    egui::Rect::from_min_max(min, max),
                    0.0,
                    Color32::from_rgb(r, g, b),
                );
            }
            ui.label(RichText::new(format!("{:.2}", hi)).size(11.0));
            ui.label(RichText::new(caption).size(11.0).color(Color32::GRAY));
        });
    }

    /// Draw the summary statistics table, one column per dataset column.
    pub fn draw_summary_table(ui: &mut egui::Ui, summary: &Summary) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("summary_table")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("");
                        for column in &summary.columns {
                            ui.label(RichText::new(&column.name).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in SUMMARY_ROWS {
                            ui.label(RichText::new(row).strong().size(11.0));
                            for column in &summary.columns {
                                ui.label(RichText::new(column.cell(row)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn marker_radius_scales_with_area() {
        assert_eq!(ChartPlotter::marker_radius(0.0, 100.0), MIN_MARKER_RADIUS);
        assert_eq!(ChartPlotter::marker_radius(100.0, 100.0), MAX_MARKER_RADIUS);
        assert_eq!(ChartPlotter::marker_radius(5.0, 0.0), MIN_MARKER_RADIUS);
        let quarter = ChartPlotter::marker_radius(25.0, 100.0);
        assert_eq!(quarter, 8.0);
    }

    #[test]
    fn grouped_bars_are_centered() {
        let (width, offsets) = ChartPlotter::bar_layout(2, 1.0);
        assert_relative_eq!(width, 0.4);
        assert_relative_eq!(offsets[0], -0.2);
        assert_relative_eq!(offsets[1], 0.2);

        let (width, offsets) = ChartPlotter::bar_layout(1, 10.0);
        assert_relative_eq!(width, 8.0);
        assert_eq!(offsets, vec![0.0]);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(10));
    }
}
