//! Population Dashboard - CSV population statistics & interactive chart viewer

use eframe::egui;
use population_dashboard::config::AppConfig;
use population_dashboard::gui::DashboardApp;
use population_dashboard::telemetry;

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = AppConfig::default();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title(config.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        "Population Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start dashboard: {e}"))
}
