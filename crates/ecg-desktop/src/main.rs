//! ECG Dashboard: prediction results, Normal-vs-MI comparison and the
//! interactive cardiac cycle

mod app;
mod config;
mod egui_charts;
mod egui_surface;
mod prediction;
mod ui;

use app::EcgDashboardApp;
use config::{DashboardConfig, CONFIG_ENV_VAR};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = DashboardConfig::resolve_path(
        std::env::args().nth(1),
        std::env::var_os(CONFIG_ENV_VAR),
    );
    let config = DashboardConfig::load_or_default(config_path.as_deref());
    info!(
        leads = config.initial_leads.len(),
        demo_condition = %config.demo.condition,
        "starting ECG dashboard"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "ECG Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(EcgDashboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run native app: {}", e))?;

    Ok(())
}
