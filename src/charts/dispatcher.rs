//! Chart Dispatcher Module
//! Turns a chart request into a chart specification for the plotter.

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::request::{ChartKind, ChartRequest};
use super::spec::{
    BarMode, ChartSpec, ColorScale, HeatmapChart, ScatterChart, ScatterPoint, ScatterSeries,
    Series, SeriesChart, XAxis,
};
use crate::data::{any_to_text, is_numeric_dtype, numeric_values, pivot_mean, Dataset, PivotError};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unsupported chart type: {0}")]
    UnsupportedChartKind(String),
    #[error("Column {0} has no numeric values")]
    NoNumericValues(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Pivot error: {0}")]
    PivotError(#[from] PivotError),
}

/// Color of one plot row: a discrete group or a value on a continuous scale.
#[derive(Debug, Clone, PartialEq)]
enum RowColor {
    None,
    Group(String),
    Shade(f64),
}

/// Rows usable for plotting: (color, x position, y value).
struct PlotRows {
    x_axis: XAxis,
    rows: Vec<(RowColor, f64, f64)>,
}

/// Builds chart specifications from the dataset.
pub struct ChartDispatcher;

impl ChartDispatcher {
    /// Build the chart for a request. Every kind has exactly one branch.
    pub fn dispatch(dataset: &Dataset, request: &ChartRequest) -> Result<ChartSpec, DispatchError> {
        let df = dataset.dataframe();
        debug!(
            kind = request.kind.id(),
            x = %request.x,
            y = %request.y,
            color = ?request.color,
            "dispatching chart"
        );

        let y_values = numeric_values(df.column(&request.y)?)?;
        if y_values.iter().all(|v| v.map_or(true, f64::is_nan)) {
            return Err(DispatchError::NoNumericValues(request.y.clone()));
        }

        let spec = match request.kind {
            ChartKind::Line => ChartSpec::Line {
                chart: Self::series_chart(df, request)?,
                markers: true,
            },
            ChartKind::Bar => ChartSpec::Bar {
                chart: Self::series_chart(df, request)?,
                mode: BarMode::Group,
            },
            ChartKind::Scatter => ChartSpec::Scatter(Self::scatter_chart(df, request)?),
            ChartKind::Heatmap => ChartSpec::Heatmap(Self::heatmap_chart(df, request)?),
        };

        Ok(spec)
    }

    fn series_chart(df: &DataFrame, request: &ChartRequest) -> Result<SeriesChart, DispatchError> {
        let PlotRows { x_axis, rows } = Self::collect_rows(df, request, false)?;

        let series = Self::group_rows(rows)
            .into_iter()
            .map(|(name, points)| Series {
                name,
                points: points.into_iter().map(|(x, y)| [x, y]).collect(),
            })
            .collect();

        Ok(SeriesChart {
            title: request.title(),
            x_label: request.x.clone(),
            y_label: request.y.clone(),
            x_axis,
            series,
        })
    }

    fn scatter_chart(
        df: &DataFrame,
        request: &ChartRequest,
    ) -> Result<ScatterChart, DispatchError> {
        let PlotRows { x_axis, rows } = Self::collect_rows(df, request, true)?;

        let point = |color: &RowColor, x: f64, y: f64| ScatterPoint {
            x,
            y,
            size: y.max(0.0),
            shade: match color {
                RowColor::Shade(v) => Some(*v),
                _ => None,
            },
        };

        let shaded = rows.iter().any(|(c, _, _)| matches!(c, RowColor::Shade(_)));
        let series: Vec<ScatterSeries> = if shaded {
            // Numeric color: one trace, each point on the color scale.
            vec![ScatterSeries {
                name: None,
                points: rows.iter().map(|(c, x, y)| point(c, *x, *y)).collect(),
            }]
        } else {
            Self::group_rows(rows)
                .into_iter()
                .map(|(name, points)| ScatterSeries {
                    name,
                    points: points
                        .into_iter()
                        .map(|(x, y)| point(&RowColor::None, x, y))
                        .collect(),
                })
                .collect()
        };

        let max_size = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.size))
            .fold(0.0, f64::max);
        let shade_range = series
            .iter()
            .flat_map(|s| s.points.iter().filter_map(|p| p.shade))
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });

        Ok(ScatterChart {
            title: request.title(),
            x_label: request.x.clone(),
            y_label: request.y.clone(),
            color_label: request.color.clone(),
            x_axis,
            series,
            max_size,
            shade_range,
            color_scale: ColorScale::Viridis,
        })
    }

    fn heatmap_chart(
        df: &DataFrame,
        request: &ChartRequest,
    ) -> Result<HeatmapChart, DispatchError> {
        let pivot = pivot_mean(df, &request.x, request.heatmap_columns(), &request.y)?;
        debug!(
            rows = pivot.row_keys.len(),
            columns = pivot.col_keys.len(),
            "pivoted heatmap"
        );

        Ok(HeatmapChart {
            title: request.title(),
            pivot,
            color_scale: ColorScale::Viridis,
        })
    }

    /// Extract plottable rows; rows with a missing x, y or color value are dropped.
    ///
    /// With `shade_numeric`, a numeric color column colors by value instead of
    /// splitting into one group per distinct value.
    fn collect_rows(
        df: &DataFrame,
        request: &ChartRequest,
        shade_numeric: bool,
    ) -> Result<PlotRows, DispatchError> {
        let x_col = df.column(&request.x)?;
        let ys = numeric_values(df.column(&request.y)?)?;
        let color_col = match request.color.as_deref() {
            Some(name) => Some(df.column(name)?),
            None => None,
        };
        let shades = match color_col {
            Some(col) if shade_numeric && is_numeric_dtype(col.dtype()) => {
                Some(numeric_values(col)?)
            }
            _ => None,
        };

        let (x_axis, xs) = Self::x_positions(x_col)?;

        let mut rows = Vec::with_capacity(df.height());
        for (i, (x, y)) in xs.into_iter().zip(ys).enumerate() {
            let (Some(x), Some(y)) = (x, y) else {
                continue;
            };
            if x.is_nan() || y.is_nan() {
                continue;
            }

            let color = match (&shades, color_col) {
                (Some(shades), _) => match shades[i] {
                    Some(v) if !v.is_nan() => RowColor::Shade(v),
                    _ => continue,
                },
                (None, Some(col)) => match any_to_text(&col.get(i)?) {
                    Some(g) => RowColor::Group(g),
                    None => continue,
                },
                (None, None) => RowColor::None,
            };

            rows.push((color, x, y));
        }

        debug!(rows = rows.len(), total = df.height(), "collected plot rows");
        Ok(PlotRows { x_axis, rows })
    }

    /// Numeric columns plot at their value, anything else by category index.
    fn x_positions(column: &Column) -> PolarsResult<(XAxis, Vec<Option<f64>>)> {
        if is_numeric_dtype(column.dtype()) {
            let cast = column.cast(&DataType::Float64)?;
            let xs = cast.f64()?.into_iter().collect();
            return Ok((XAxis::Numeric, xs));
        }

        let mut labels: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut xs = Vec::with_capacity(column.len());

        for i in 0..column.len() {
            let Some(label) = any_to_text(&column.get(i)?) else {
                xs.push(None);
                continue;
            };
            let pos = match index.get(&label) {
                Some(&pos) => pos,
                None => {
                    let pos = labels.len();
                    index.insert(label.clone(), pos);
                    labels.push(label);
                    pos
                }
            };
            xs.push(Some(pos as f64));
        }

        Ok((XAxis::Categorical(labels), xs))
    }

    /// Split rows by color group, keeping first-appearance order.
    fn group_rows(rows: Vec<(RowColor, f64, f64)>) -> Vec<(Option<String>, Vec<(f64, f64)>)> {
        let mut groups: Vec<(Option<String>, Vec<(f64, f64)>)> = Vec::new();
        let mut index: HashMap<Option<String>, usize> = HashMap::new();

        for (color, x, y) in rows {
            let group = match color {
                RowColor::Group(g) => Some(g),
                RowColor::None | RowColor::Shade(_) => None,
            };
            let slot = match index.get(&group) {
                Some(&slot) => slot,
                None => {
                    index.insert(group.clone(), groups.len());
                    groups.push((group, Vec::new()));
                    groups.len() - 1
                }
            };
            groups[slot].1.push((x, y));
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataOrigin, TextEncoding};

    fn dataset() -> Dataset {
        let df = df!(
            "월" => ["2025-07", "2025-08", "2025-09", "2025-07", "2025-08", "2025-09"],
            "시도" => ["서울", "서울", "서울", "부산", "부산", "부산"],
            "세대수" => [4_470_000i64, 4_471_000, 4_473_563, 1_574_000, 1_574_500, 1_575_183],
        )
        .unwrap();
        Dataset::new(df, DataOrigin::Uploaded("t.csv".into()), TextEncoding::Utf8)
    }

    #[test]
    fn line_groups_by_color_with_markers() {
        let req = ChartRequest::new("월", "세대수", ChartKind::Line)
            .with_color(Some("시도".to_string()));
        let spec = ChartDispatcher::dispatch(&dataset(), &req).unwrap();

        let ChartSpec::Line { chart, markers } = spec else {
            panic!("expected line chart");
        };
        assert!(markers);
        assert_eq!(chart.title, "월별 세대수 추이");
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec![Some("서울"), Some("부산")]);
        assert_eq!(chart.series[1].points[2], [2.0, 1_575_183.0]);
        assert_eq!(
            chart.x_axis,
            XAxis::Categorical(vec!["2025-07".into(), "2025-08".into(), "2025-09".into()])
        );
    }

    #[test]
    fn bar_without_color_is_single_series() {
        let req = ChartRequest::new("시도", "세대수", ChartKind::Bar);
        let ChartSpec::Bar { chart, mode } = ChartDispatcher::dispatch(&dataset(), &req).unwrap()
        else {
            panic!("expected bar chart");
        };
        assert_eq!(mode, BarMode::Group);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, None);
        assert_eq!(chart.series[0].points.len(), 6);
    }

    #[test]
    fn scatter_sizes_follow_y() {
        let req = ChartRequest::new("시도", "세대수", ChartKind::Scatter);
        let ChartSpec::Scatter(chart) = ChartDispatcher::dispatch(&dataset(), &req).unwrap() else {
            panic!("expected scatter chart");
        };
        assert_eq!(chart.max_size, 4_473_563.0);
        assert!(chart
            .series
            .iter()
            .flat_map(|s| &s.points)
            .all(|p| p.size == p.y));
    }

    #[test]
    fn heatmap_pivots_by_color_column() {
        let req = ChartRequest::new("시도", "세대수", ChartKind::Heatmap)
            .with_color(Some("월".to_string()));
        let ChartSpec::Heatmap(chart) = ChartDispatcher::dispatch(&dataset(), &req).unwrap() else {
            panic!("expected heatmap");
        };
        assert_eq!(chart.color_scale, ColorScale::Viridis);
        assert_eq!(chart.pivot.shape(), (2, 3));
        assert_eq!(chart.pivot.row_keys, vec!["부산", "서울"]);
        assert_eq!(chart.pivot.value("서울", "2025-09"), Some(4_473_563.0));
    }

    #[test]
    fn numeric_x_uses_values() {
        let df = df!("연도" => [2023i64, 2024], "인구" => [1.5, 2.5]).unwrap();
        let ds = Dataset::new(df, DataOrigin::Uploaded("n.csv".into()), TextEncoding::Utf8);
        let req = ChartRequest::new("연도", "인구", ChartKind::Line);
        let ChartSpec::Line { chart, .. } = ChartDispatcher::dispatch(&ds, &req).unwrap() else {
            panic!("expected line chart");
        };
        assert_eq!(chart.x_axis, XAxis::Numeric);
        assert_eq!(chart.series[0].points, vec![[2023.0, 1.5], [2024.0, 2.5]]);
    }

    #[test]
    fn text_y_without_numbers_is_reported() {
        for kind in ChartKind::ALL {
            let req = ChartRequest::new("시도", "시도", kind);
            let err = ChartDispatcher::dispatch(&dataset(), &req).unwrap_err();
            assert!(matches!(err, DispatchError::NoNumericValues(ref c) if c == "시도"));
        }
    }

    #[test]
    fn text_y_with_separators_is_plotted() {
        let df = df!(
            "행정구역" => ["서울특별시", "부산광역시"],
            "총인구수" => ["9,386,034", "3,266,598"],
        )
        .unwrap();
        let ds = Dataset::new(df, DataOrigin::Uploaded("q.csv".into()), TextEncoding::Utf8);
        let req = ChartRequest::new("행정구역", "총인구수", ChartKind::Bar);
        let ChartSpec::Bar { chart, .. } = ChartDispatcher::dispatch(&ds, &req).unwrap() else {
            panic!("expected bar chart");
        };
        assert_eq!(chart.series[0].points, vec![[0.0, 9_386_034.0], [1.0, 3_266_598.0]]);
    }

    #[test]
    fn multi_chunk_columns_dispatch() {
        let mut df = df!("시도" => ["서울", "부산"], "세대수" => [4i64, 1]).unwrap();
        let tail = df!("시도" => ["서울", "대구"], "세대수" => [5i64, 2]).unwrap();
        df.vstack_mut(&tail).unwrap();
        assert!(df.column("시도").unwrap().n_chunks() > 1);

        let ds = Dataset::new(df, DataOrigin::Uploaded("c.csv".into()), TextEncoding::Utf8);
        let req = ChartRequest::new("시도", "세대수", ChartKind::Line);
        let ChartSpec::Line { chart, .. } = ChartDispatcher::dispatch(&ds, &req).unwrap() else {
            panic!("expected line chart");
        };
        assert_eq!(
            chart.x_axis,
            XAxis::Categorical(vec!["서울".into(), "부산".into(), "대구".into()])
        );
        assert_eq!(chart.series[0].points.len(), 4);
    }

    #[test]
    fn numeric_color_shades_scatter_in_one_trace() {
        let req = ChartRequest::new("시도", "세대수", ChartKind::Scatter)
            .with_color(Some("세대수".to_string()));
        let ChartSpec::Scatter(chart) = ChartDispatcher::dispatch(&dataset(), &req).unwrap() else {
            panic!("expected scatter chart");
        };
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].points.len(), 6);
        assert_eq!(chart.shade_range, Some((1_574_000.0, 4_473_563.0)));
        assert!(chart.series[0].points.iter().all(|p| p.shade == Some(p.y)));
    }

    #[test]
    fn text_color_keeps_discrete_scatter_groups() {
        let req = ChartRequest::new("월", "세대수", ChartKind::Scatter)
            .with_color(Some("시도".to_string()));
        let ChartSpec::Scatter(chart) = ChartDispatcher::dispatch(&dataset(), &req).unwrap() else {
            panic!("expected scatter chart");
        };
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.shade_range, None);
    }

    #[test]
    fn unknown_column_is_reported() {
        let req = ChartRequest::new("없는컬럼", "세대수", ChartKind::Line);
        assert!(matches!(
            ChartDispatcher::dispatch(&dataset(), &req),
            Err(DispatchError::PolarsError(_))
        ));
    }
}
