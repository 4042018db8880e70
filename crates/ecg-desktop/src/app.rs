//! Main application state and logic

use std::path::PathBuf;

use ecg_render::{ChartManager, SyncReport};
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::egui_charts::EguiChartBackend;
use crate::prediction::{demo_prediction, load_prediction, LoadedPrediction};
use crate::ui::{self, ComparisonCards, CycleView, View};

/// Main application state
pub struct EcgDashboardApp {
    config: DashboardConfig,
    charts: ChartManager<EguiChartBackend>,
    prediction: Option<LoadedPrediction>,
    comparison: ComparisonCards,
    cycle: CycleView,
    view: View,
    status: Option<String>,
}

impl EcgDashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        let charts = ChartManager::new(
            EguiChartBackend::default(),
            config.charts.clone(),
            config.initial_leads,
        );
        let mut app = Self {
            comparison: ComparisonCards::new(config.comparison.clone()),
            cycle: CycleView::new(),
            charts,
            prediction: None,
            view: View::Results,
            status: None,
            config,
        };

        match demo_prediction(&app.config.demo) {
            Ok(loaded) => app.show_prediction(loaded),
            Err(e) => {
                warn!("Failed to generate demo recording: {:#}", e);
                app.status = Some(format!("Demo recording unavailable: {}", e));
            }
        }
        app
    }

    fn show_prediction(&mut self, loaded: LoadedPrediction) {
        info!(
            prediction = %loaded.prediction,
            source = %loaded.source,
            recording = %loaded.recording.id,
            "showing prediction"
        );
        self.charts.set_recording(Some(loaded.recording.clone()));
        self.prediction = Some(loaded);
    }

    fn open_prediction(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Prediction", &["json"])
            .pick_file()
        else {
            return;
        };
        self.load_prediction_file(path);
    }

    fn load_prediction_file(&mut self, path: PathBuf) {
        match load_prediction(&path, self.config.sample_rate) {
            Ok(loaded) => {
                self.status = None;
                self.switch_view(View::Results);
                self.show_prediction(loaded);
            }
            Err(e) => {
                warn!("{:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    fn switch_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        // Lead charts only exist while the results view is mounted
        if self.view == View::Results {
            self.charts.teardown();
        }
        debug!(from = self.view.title(), to = view.title(), "switching view");
        self.view = view;
    }

    fn log_sync(report: &SyncReport) {
        if report.is_quiet() {
            return;
        }
        debug!(
            created = report.created.len(),
            destroyed = report.destroyed.len(),
            skipped = report.skipped.len(),
            "synced lead charts"
        );
    }

    fn results_view(&mut self, ui: &mut egui::Ui) {
        match &self.prediction {
            Some(loaded) => ui::prediction_banner(ui, loaded),
            None => {
                ui.label("No prediction loaded. Use File → Open prediction…");
            }
        }
        ui.separator();

        if !ui::lead_selector(ui, &mut self.charts) {
            self.status = Some("At least one lead stays visible".to_string());
        }
        ui.separator();

        // Every visible lead gets its plot area in this frame
        let report = self.charts.sync(|_| true);
        Self::log_sync(&report);

        ui::lead_charts(ui, &mut self.charts);
    }
}

impl eframe::App for EcgDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.load_prediction_file(path);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open prediction…").clicked() {
                        ui.close_menu();
                        self.open_prediction();
                    }
                    if ui.button("Load demo recording").clicked() {
                        ui.close_menu();
                        match demo_prediction(&self.config.demo) {
                            Ok(loaded) => self.show_prediction(loaded),
                            Err(e) => self.status = Some(format!("{:#}", e)),
                        }
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.separator();
                for view in View::ALL {
                    if ui.selectable_label(self.view == view, view.title()).clicked() {
                        self.switch_view(view);
                    }
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Charts: {} · Visible leads: {}",
                    self.charts.backend().live(),
                    self.charts.visible().len()
                ));
                if let Some(recording) = self.charts.recording() {
                    ui.separator();
                    ui.label(format!(
                        "{} leads @ {:.0} Hz, {:.1} s",
                        recording.lead_count(),
                        recording.sample_rate,
                        recording.duration()
                    ));
                }
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Results => self.results_view(ui),
            View::Comparison => {
                egui::ScrollArea::both().show(ui, |ui| self.comparison.show(ui));
            }
            View::Cycle => {
                egui::ScrollArea::vertical().show(ui, |ui| self.cycle.show(ui));
            }
        });
    }
}
