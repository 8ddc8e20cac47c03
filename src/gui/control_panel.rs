//! Control Panel Widget
//! Left side panel with the data source and chart selectors.

use crate::charts::ChartKind;
use crate::session::Selections;
use egui::{Color32, ComboBox, RichText};

const NO_COLOR_LABEL: &str = "없음";

/// Left side control panel with file selection and chart controls.
#[derive(Default)]
pub struct ControlPanel {
    pub selections: Selections,
    pub columns: Vec<String>,
    pub file_name: Option<String>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available columns after a load.
    ///
    /// X defaults to the first column, Y to `default_y` or else the first column.
    pub fn update_columns(&mut self, columns: Vec<String>, default_y: Option<String>) {
        let first = columns.first().cloned();
        self.selections.x = first.clone();
        self.selections.y = default_y.or(first);
        self.selections.color = None;
        self.columns = columns;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Data Source Section =====
        ui.add_space(5.0);
        ui.label(RichText::new("📁 CSV 파일 업로드").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .file_name
                        .clone()
                        .unwrap_or_else(|| "업로드된 파일 없음".to_string());
                    let path_color = if self.file_name.is_some() {
                        ui.visuals().strong_text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 찾아보기").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if self.file_name.is_some() && ui.small_button("✖").clicked() {
                            action = ControlPanelAction::ClearUpload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Settings Section =====
        ui.label(RichText::new("⚙ 시각화 설정").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 100.0;
        let combo_width = 170.0;

        let before = self.selections.clone();

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("X축 컬럼 선택"));
            Self::column_combo(ui, "x_col", combo_width, &self.columns, &mut self.selections.x);
        });
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Y축 컬럼 선택"));
            Self::column_combo(ui, "y_col", combo_width, &self.columns, &mut self.selections.y);
        });
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("색상 그룹(선택)"));
            let selected = self
                .selections
                .color
                .clone()
                .unwrap_or_else(|| NO_COLOR_LABEL.to_string());
            ComboBox::from_id_salt("color_col")
                .width(combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.selections.color, None, NO_COLOR_LABEL);
                    for col in &self.columns {
                        ui.selectable_value(&mut self.selections.color, Some(col.clone()), col);
                    }
                });
        });

        ui.add_space(12.0);
        ui.label(RichText::new("시각화 유형 선택").size(13.0));
        ui.add_space(4.0);
        for kind in ChartKind::ALL {
            if ui
                .radio(self.selections.kind == kind.label(), kind.label())
                .clicked()
            {
                self.selections.kind = kind.label().to_string();
            }
        }

        if action == ControlPanelAction::None && self.selections != before {
            action = ControlPanelAction::SelectionChanged;
        }

        action
    }

    fn column_combo(
        ui: &mut egui::Ui,
        id: &str,
        width: f32,
        columns: &[String],
        selected: &mut Option<String>,
    ) {
        ComboBox::from_id_salt(id)
            .width(width)
            .selected_text(selected.clone().unwrap_or_default())
            .show_ui(ui, |ui| {
                for col in columns {
                    ui.selectable_value(selected, Some(col.clone()), col);
                }
            });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    ClearUpload,
    SelectionChanged,
}
