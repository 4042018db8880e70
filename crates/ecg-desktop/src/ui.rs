//! UI components: prediction banner, lead selector, comparison cards and the
//! cardiac cycle view

use ecg_core::{
    CardiacCondition, Lead, Segment, SegmentTiming, ToggleOutcome, VisibleLeadSet, CYCLE_MS,
};
use ecg_render::{ChartManager, Gesture, Rgb, TraceLayout, TraceRenderer, TraceStyle};
use ecg_synthesis::{synthesize, SynthesizedSignal, DISPLAY_PHASE_SHIFT_MS};
use egui_plot::{Line, Plot, PlotPoints, VLine};
use tracing::warn;

use crate::config::TraceCardConfig;
use crate::egui_charts::EguiChartBackend;
use crate::egui_surface::{color, EguiSurface};
use crate::prediction::LoadedPrediction;

/// Top-level views of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Results,
    Comparison,
    Cycle,
}

impl View {
    pub const ALL: [View; 3] = [View::Results, View::Comparison, View::Cycle];

    pub fn title(&self) -> &'static str {
        match self {
            View::Results => "Results",
            View::Comparison => "Normal vs MI",
            View::Cycle => "Cardiac Cycle",
        }
    }
}

/// Label, confidence and provenance of the current prediction
pub fn prediction_banner(ui: &mut egui::Ui, loaded: &LoadedPrediction) {
    let accent = loaded
        .prediction
        .condition()
        .map(|condition| color(Rgb::from_hex(condition.trace_rgb())))
        .unwrap_or(egui::Color32::GRAY);

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Prediction:").strong());
        ui.label(
            egui::RichText::new(&loaded.prediction.label)
                .color(accent)
                .strong()
                .size(20.0),
        );
        ui.label(format!(
            "{:.1}% confidence",
            loaded.prediction.probability * 100.0
        ));
        ui.separator();
        ui.label(format!(
            "{} · loaded {}",
            loaded.source,
            loaded.loaded_at.format("%H:%M:%S")
        ));
    });
}

/// Twelve lead toggles plus "All". Returns false when a click tried to hide
/// the last visible lead.
pub fn lead_selector(ui: &mut egui::Ui, charts: &mut ChartManager<EguiChartBackend>) -> bool {
    let mut accepted = true;
    ui.horizontal_wrapped(|ui| {
        ui.label("Leads:");
        let all = charts.visible().is_all();
        if ui.selectable_label(all, "All").clicked() && !all {
            charts.set_visible(VisibleLeadSet::all());
        }
        ui.separator();

        for lead in Lead::ALL {
            let shown = charts.visible().contains(lead);
            if ui.selectable_label(shown, lead.name()).clicked()
                && charts.toggle(lead) == ToggleOutcome::Rejected
            {
                accepted = false;
            }
        }
    });
    accepted
}

/// One chart per visible lead, in lead order
pub fn lead_charts(ui: &mut egui::Ui, charts: &mut ChartManager<EguiChartBackend>) {
    let visible: Vec<Lead> = charts.visible().iter().collect();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for lead in visible {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(lead.title());
                    if ui.small_button("Reset zoom").clicked() {
                        charts.apply_gesture(lead, Gesture::Reset);
                    }
                });

                match charts.slot_mut(lead) {
                    Some(slot) => {
                        let pending = slot.take_pending_viewport();
                        let shown = slot.handle_mut().show(ui, pending);
                        slot.observe_viewport(shown);
                    }
                    None => {
                        ui.weak("No data for this lead");
                    }
                }
            });
        }
    });
}

/// Normal and MI reference cycles in the labelled display frame
pub struct ComparisonCards {
    config: TraceCardConfig,
    signals: Vec<SynthesizedSignal>,
}

impl ComparisonCards {
    pub fn new(config: TraceCardConfig) -> Self {
        let signals = CardiacCondition::ALL
            .into_iter()
            .filter_map(|condition| {
                // Annotation labels sit on the features only in this frame
                match synthesize(config.length, DISPLAY_PHASE_SHIFT_MS, condition) {
                    Ok(signal) => Some(signal),
                    Err(e) => {
                        warn!(%condition, "synthesis failed: {}", e);
                        None
                    }
                }
            })
            .collect();
        Self { config, signals }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.heading("Normal vs Myocardial Infarction");
        ui.add_space(8.0);

        let pixel_density = ui.ctx().pixels_per_point();
        ui.horizontal(|ui| {
            for signal in &self.signals {
                ui.vertical(|ui| {
                    ui.strong(signal.condition().to_string());
                    self.card(ui, signal, pixel_density);
                    if signal.condition().has_st_elevation() {
                        ui.label("ST elevation between S and T");
                    } else {
                        ui.label("Isoelectric ST segment");
                    }
                });
            }
        });
    }

    fn card(&self, ui: &mut egui::Ui, signal: &SynthesizedSignal, pixel_density: f32) {
        let size = egui::vec2(self.config.width, self.config.height);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());

        let layout = TraceLayout {
            vertical_offset: self.config.vertical_offset,
            ..TraceLayout::card(self.config.width, self.config.height, pixel_density)
        };
        let style = TraceStyle {
            background: Some(Rgb::new(255, 255, 255)),
            ..TraceStyle::for_condition(signal.condition())
        };

        let mut surface = EguiSurface::new(&painter, response.rect);
        TraceRenderer::new(layout, style).render(&mut surface, signal);
    }
}

/// Interactive Normal cycle with hover descriptions and segment cards
pub struct CycleView {
    timing: SegmentTiming,
    points: Vec<[f64; 2]>,
}

impl CycleView {
    pub fn new() -> Self {
        let timing = SegmentTiming::STANDARD;
        let length = CYCLE_MS as usize;
        let points = match synthesize(length, 0.0, CardiacCondition::Normal) {
            Ok(signal) => signal
                .samples()
                .iter()
                .enumerate()
                .map(|(i, &v)| [i as f64 * CYCLE_MS / length as f64, v])
                .collect(),
            Err(e) => {
                warn!("cycle synthesis failed: {}", e);
                Vec::new()
            }
        };
        Self { timing, points }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.heading("The Cardiac Cycle");
        ui.label("Hover over the trace to see which event produces each part of the beat.");

        let timing = self.timing;
        Plot::new("cardiac_cycle")
            .height(280.0)
            .include_x(0.0)
            .include_x(CYCLE_MS)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Time (ms)")
            .y_axis_label("Amplitude (mV)")
            .label_formatter(move |_name, value| {
                format!("{:.0} ms\n{}", value.x, timing.hover_text(value.x))
            })
            .show(ui, |plot_ui| {
                for boundary in [
                    timing.pr_segment.start_ms,
                    timing.q_wave.start_ms,
                    timing.st_segment.start_ms,
                    timing.t_wave.start_ms,
                    timing.tp_segment.start_ms,
                ] {
                    plot_ui.vline(VLine::new(boundary).color(egui::Color32::from_gray(120)));
                }
                plot_ui.line(
                    Line::new(PlotPoints::new(self.points.clone()))
                        .color(color(Rgb::from_hex(CardiacCondition::Normal.trace_rgb())))
                        .width(2.0)
                        .name("Normal"),
                );
            });

        ui.add_space(12.0);
        egui::Grid::new("segment_cards")
            .num_columns(3)
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (i, segment) in Segment::ALL.into_iter().enumerate() {
                    self.segment_card(ui, segment);
                    if i % 3 == 2 {
                        ui.end_row();
                    }
                }
            });
    }

    fn segment_card(&self, ui: &mut egui::Ui, segment: Segment) {
        ui.group(|ui| {
            ui.set_width(260.0);
            ui.vertical(|ui| {
                ui.strong(self.timing.heading(segment));
                ui.label(egui::RichText::new(segment.event()).italics());
                ui.label(segment.description());
            });
        });
    }
}

impl Default for CycleView {
    fn default() -> Self {
        Self::new()
    }
}
