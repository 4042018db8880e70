//! `egui_plot` backed lead charts

use ecg_core::{Lead, LeadSeries};
use ecg_render::{ChartBackend, ChartConfig, XViewport};
use egui::Color32;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};
use tracing::debug;

use crate::egui_surface::color;

/// One lead's plot: its data, styling and plot memory state
pub struct PlotChart {
    lead: Lead,
    points: Vec<[f64; 2]>,
    line_color: Color32,
    line_width: f32,
    height: f32,
    x_axis_label: String,
    y_axis_label: String,
    /// Discard zoom state left in egui memory by a previous chart of this lead
    needs_reset: bool,
}

impl PlotChart {
    fn new(series: &LeadSeries, config: &ChartConfig) -> Self {
        Self {
            lead: series.lead,
            points: series.points(),
            line_color: color(config.line_color),
            line_width: config.line_width,
            height: config.height,
            x_axis_label: config.x_axis_label.clone(),
            y_axis_label: config.y_axis_label.clone(),
            needs_reset: true,
        }
    }

    pub fn lead(&self) -> Lead {
        self.lead
    }

    /// Draw the chart, moving it to `pending` first if the host requested a
    /// window change. Returns the x window the plot ended up showing.
    pub fn show(&mut self, ui: &mut egui::Ui, pending: Option<XViewport>) -> XViewport {
        let mut plot = Plot::new(("ecg_lead_chart", self.lead.index()))
            .height(self.height)
            .allow_zoom([true, false])
            .allow_drag([true, false])
            .allow_scroll([true, false])
            .allow_boxed_zoom(false)
            .x_axis_label(self.x_axis_label.clone())
            .y_axis_label(self.y_axis_label.clone());
        if self.needs_reset {
            plot = plot.reset();
            self.needs_reset = false;
        }

        let line = Line::new(PlotPoints::new(self.points.clone()))
            .color(self.line_color)
            .width(self.line_width)
            .name(self.lead.title());

        let response = plot.show(ui, |plot_ui| {
            plot_ui.line(line);
            if let Some(window) = pending {
                let bounds = plot_ui.plot_bounds();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [window.min, bounds.min()[1]],
                    [window.max, bounds.max()[1]],
                ));
            }
        });

        let bounds = response.transform.bounds();
        XViewport::new(bounds.min()[0], bounds.max()[0])
    }
}

/// Hands out plot charts and counts the live ones
#[derive(Debug, Default)]
pub struct EguiChartBackend {
    live: usize,
}

impl EguiChartBackend {
    pub fn live(&self) -> usize {
        self.live
    }
}

impl ChartBackend for EguiChartBackend {
    type Handle = PlotChart;

    fn create(&mut self, series: &LeadSeries, config: &ChartConfig) -> PlotChart {
        self.live += 1;
        PlotChart::new(series, config)
    }

    fn destroy(&mut self, handle: PlotChart) {
        self.live = self.live.saturating_sub(1);
        debug!(lead = %handle.lead(), live = self.live, "released plot");
    }
}
