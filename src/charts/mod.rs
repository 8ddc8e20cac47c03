//! Charts module - chart requests, dispatch and rendering

mod dispatcher;
mod plotter;
mod request;
mod spec;

pub use dispatcher::{ChartDispatcher, DispatchError};
pub use plotter::ChartPlotter;
pub use request::{ChartKind, ChartRequest};
pub use spec::{
    BarMode, ChartSpec, ColorScale, HeatmapChart, ScatterChart, ScatterPoint, ScatterSeries,
    Series, SeriesChart, XAxis,
};
