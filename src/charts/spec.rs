//! Chart specifications produced by the dispatcher and drawn by the plotter.

use crate::data::PivotTable;

/// How x positions map to axis labels.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Positions are the column's numeric values.
    Numeric,
    /// Positions are indices into these labels (first-appearance order).
    Categorical(Vec<String>),
}

impl XAxis {
    /// Label for an axis position, if it lands on a category.
    pub fn label_at(&self, position: f64) -> Option<String> {
        match self {
            XAxis::Numeric => None,
            XAxis::Categorical(labels) => {
                let idx = position.round();
                if idx < 0.0 || (position - idx).abs() > 1e-6 {
                    return None;
                }
                labels.get(idx as usize).cloned()
            }
        }
    }
}

/// One trace; `name` is the color-group value, `None` without a color column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
}

/// Shared shape of line and bar charts.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarMode {
    /// Bars of different groups sit side by side.
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Marker size value, never negative.
    pub size: f64,
    /// Value of a numeric color column, drawn on the chart's color scale.
    pub shade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: Option<String>,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color_label: Option<String>,
    pub x_axis: XAxis,
    pub series: Vec<ScatterSeries>,
    /// Largest size value across all series, used to scale markers.
    pub max_size: f64,
    /// Range of point shades when colored by a numeric column.
    pub shade_range: Option<(f64, f64)>,
    pub color_scale: ColorScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    Viridis,
}

const VIRIDIS: [[u8; 3]; 10] = [
    [0x44, 0x01, 0x54],
    [0x48, 0x28, 0x78],
    [0x3e, 0x49, 0x89],
    [0x31, 0x68, 0x8e],
    [0x26, 0x82, 0x8e],
    [0x1f, 0x9e, 0x89],
    [0x35, 0xb7, 0x79],
    [0x6e, 0xce, 0x58],
    [0xb5, 0xde, 0x2b],
    [0xfd, 0xe7, 0x25],
];

impl ColorScale {
    /// RGB at `t` in `[0, 1]`; out-of-range values are clamped.
    pub fn sample(self, t: f64) -> [u8; 3] {
        let stops = match self {
            ColorScale::Viridis => &VIRIDIS,
        };
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        let frac = scaled - lower as f64;

        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            let a = stops[lower][i] as f64;
            let b = stops[upper][i] as f64;
            *channel = (a + (b - a) * frac).round() as u8;
        }
        rgb
    }

    /// Normalize `value` into `[0, 1]` over `range` and sample.
    pub fn color_for(self, value: f64, (lo, hi): (f64, f64)) -> [u8; 3] {
        let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.5 };
        self.sample(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub title: String,
    pub pivot: PivotTable,
    pub color_scale: ColorScale,
}

/// A chart ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Line { chart: SeriesChart, markers: bool },
    Bar { chart: SeriesChart, mode: BarMode },
    Scatter(ScatterChart),
    Heatmap(HeatmapChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line { chart, .. } | ChartSpec::Bar { chart, .. } => &chart.title,
            ChartSpec::Scatter(chart) => &chart.title,
            ChartSpec::Heatmap(chart) => &chart.title,
        }
    }
}
