//! Population Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::AppConfig;
use crate::data::{DataLoader, UploadedFile};
use crate::gui::{fonts, ChartViewer, ControlPanel, ControlPanelAction};
use crate::session::Session;
use egui::SidePanel;
use tracing::info;

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    loader: DataLoader,
    session: Session,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        fonts::install_cjk_fonts(&cc.egui_ctx, &config.font_candidates);

        let loader = DataLoader::new(config.default_csv_path.clone());
        let session = Session::open(&loader, None);
        let mut control_panel = ControlPanel::new();
        control_panel.update_columns(session.columns(), session.default_y_column());

        Self {
            config,
            loader,
            session,
            control_panel,
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Replace the session and reset everything derived from it.
    fn replace_session(&mut self, session: Session) {
        self.session = session;
        self.control_panel
            .update_columns(self.session.columns(), self.session.default_y_column());
        self.chart_viewer.clear();
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return; // User cancelled
        };

        info!(path = %path.display(), "csv picked");
        let session = match UploadedFile::from_path(&path) {
            Ok(upload) => {
                self.control_panel.file_name = Some(upload.name.clone());
                Session::open(&self.loader, Some(&upload))
            }
            Err(e) => {
                self.control_panel.file_name = None;
                Session::from_error(e)
            }
        };
        self.replace_session(session);
    }

    /// Drop the upload and fall back to the default file.
    fn handle_clear_upload(&mut self) {
        self.control_panel.file_name = None;
        let session = Session::open(&self.loader, None);
        self.replace_session(session);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ClearUpload => self.handle_clear_upload(),
                        // The viewer re-runs the cycle when selections differ.
                        ControlPanelAction::SelectionChanged | ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.chart_viewer.show(
                    ui,
                    &self.config.title,
                    &self.session,
                    &self.control_panel.selections,
                    self.config.preview_rows,
                );
            });
        });
    }
}
