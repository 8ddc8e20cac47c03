//! Chart Viewer Widget
//! Central panel: load notice, data preview, chart and summary statistics.

use crate::charts::{ChartPlotter, ChartSpec};
use crate::data::Dataset;
use crate::session::{RenderHalt, Selections, Session};
use egui::{Color32, RichText, ScrollArea};
use tracing::debug;

const CHART_HEIGHT: f32 = 420.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 193, 7);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// Scrollable central view for the current render cycle.
#[derive(Default)]
pub struct ChartViewer {
    /// Result of the last cycle and the selections it was built from.
    last_cycle: Option<(Selections, Result<ChartSpec, RenderHalt>)>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last cycle, e.g. after a new dataset was loaded.
    pub fn clear(&mut self) {
        self.last_cycle = None;
    }

    /// Run the render cycle if the selections changed since the last one.
    fn refresh(&mut self, session: &Session, selections: &Selections) {
        let stale = match &self.last_cycle {
            Some((last, _)) => last != selections,
            None => true,
        };
        if stale {
            debug!(?selections, "render cycle");
            self.last_cycle = Some((selections.clone(), session.render(selections)));
        }
    }

    /// Draw the full dashboard body.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        title: &str,
        session: &Session,
        selections: &Selections,
        preview_rows: usize,
    ) {
        self.refresh(session, selections);

        ui.heading(RichText::new(format!("📊 {}", title)).size(22.0));
        ui.add_space(8.0);

        let Some(dataset) = session.dataset() else {
            // Nothing but the halt message without data.
            if let Some((_, Err(halt))) = &self.last_cycle {
                Self::draw_halt(ui, halt);
            }
            return;
        };

        ui.label(RichText::new(dataset.origin().notice()).color(SUCCESS_COLOR));
        ui.add_space(10.0);

        ui.label(RichText::new("데이터 미리보기").size(16.0).strong());
        ui.add_space(4.0);
        Self::draw_preview(ui, dataset, preview_rows);
        ui.add_space(15.0);

        ui.label(RichText::new("📈 시각화 결과").size(16.0).strong());
        ui.add_space(4.0);
        match &self.last_cycle {
            Some((_, Ok(spec))) => ChartPlotter::draw(ui, spec, CHART_HEIGHT),
            Some((_, Err(halt))) => {
                // A halted cycle renders nothing further.
                Self::draw_halt(ui, halt);
                return;
            }
            None => return,
        }
        ui.add_space(15.0);

        if let Some(summary) = session.summary() {
            ui.label(RichText::new("📋 요약 통계").size(16.0).strong());
            ui.add_space(4.0);
            ScrollArea::horizontal()
                .id_salt("summary_scroll")
                .show(ui, |ui| ChartPlotter::draw_summary_table(ui, summary));
        }

        ui.add_space(10.0);
        ui.label(
            RichText::new(format!(
                "{} · {} rows × {} columns · {}",
                dataset.origin(),
                dataset.row_count(),
                dataset.column_count(),
                dataset.encoding()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
        ui.label(
            RichText::new("💡 Polars와 egui_plot으로 만든 인구 통계 대시보드")
                .size(11.0)
                .color(Color32::GRAY),
        );
    }

    fn draw_halt(ui: &mut egui::Ui, halt: &RenderHalt) {
        let (icon, color) = if halt.is_warning() {
            ("⚠", WARNING_COLOR)
        } else {
            ("✖", ERROR_COLOR)
        };
        egui::Frame::none()
            .stroke(egui::Stroke::new(1.5, color))
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(format!("{} {}", icon, halt)).color(color));
            });
    }

    fn draw_preview(ui: &mut egui::Ui, dataset: &Dataset, rows: usize) {
        let columns = dataset.columns();
        let preview = dataset.preview(rows);

        ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Grid::new("preview_table")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for name in &columns {
                            ui.label(RichText::new(name).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in &preview {
                            for cell in row {
                                match cell {
                                    Some(text) => ui.label(RichText::new(text).size(11.0)),
                                    None => ui.label(
                                        RichText::new("null").size(11.0).color(Color32::GRAY),
                                    ),
                                };
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
