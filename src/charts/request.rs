//! Chart request built from the current control state.

use std::fmt;
use std::str::FromStr;

use super::dispatcher::DispatchError;

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Heatmap,
    ];

    /// Label shown on the chart-kind radio.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "라인 차트",
            ChartKind::Bar => "막대 차트",
            ChartKind::Scatter => "산점도",
            ChartKind::Heatmap => "히트맵",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = DispatchError;

    /// Accepts a radio label or an ascii id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == s || kind.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| DispatchError::UnsupportedChartKind(s.to_string()))
    }
}

/// Column selections and chart kind for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub x: String,
    pub y: String,
    pub color: Option<String>,
    pub kind: ChartKind,
}

impl ChartRequest {
    pub fn new(x: impl Into<String>, y: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            color: None,
            kind,
        }
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// Column used for the heatmap's column axis.
    pub fn heatmap_columns(&self) -> &str {
        self.color.as_deref().unwrap_or(&self.x)
    }

    pub fn title(&self) -> String {
        let (x, y) = (&self.x, &self.y);
        match self.kind {
            ChartKind::Line => format!("{x}별 {y} 추이"),
            ChartKind::Bar => format!("{x}별 {y} 막대 차트"),
            ChartKind::Scatter => format!("{x} vs {y} 산점도"),
            ChartKind::Heatmap => format!("{x} × {} 히트맵", self.heatmap_columns()),
        }
    }
}
