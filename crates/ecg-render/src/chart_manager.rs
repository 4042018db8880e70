//! Multi-lead chart manager
//!
//! Owns at most one chart per lead and drives each lead through
//! `Absent -> Rendered -> Absent` as visibility, data and surface mounting
//! change. Charts are created only through [`ChartManager::create_chart`],
//! which always destroys the lead's previous chart first.

use ecg_core::{
    EcgError, EcgRecording, EcgResult, Lead, LeadSeries, ToggleOutcome, VisibleLeadSet, LEAD_COUNT,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::surface::Rgb;
use crate::viewport::{Gesture, XViewport};

/// Presentation shared by every lead chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart height in logical pixels
    pub height: f32,
    pub line_width: f32,
    pub line_color: Rgb,
    pub x_axis_label: String,
    pub y_axis_label: String,
    /// Narrowest x window zooming may reach, in seconds
    pub min_span_s: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: 256.0,
            line_width: 1.0,
            line_color: Rgb::from_hex(0x3b82f6),
            x_axis_label: "Time (s)".to_string(),
            y_axis_label: "Amplitude (mV)".to_string(),
            min_span_s: 0.1,
        }
    }
}

/// Creates and releases the rendering resources of one lead chart
pub trait ChartBackend {
    type Handle;

    /// Build a chart bound to `series`, with x-only pan and zoom
    fn create(&mut self, series: &LeadSeries, config: &ChartConfig) -> Self::Handle;

    /// Release the chart's resources; must tolerate half-initialised handles
    fn destroy(&mut self, handle: Self::Handle);
}

/// A live chart and its independent x window
#[derive(Debug)]
pub struct ChartSlot<H> {
    handle: H,
    lead: Lead,
    limits: XViewport,
    viewport: XViewport,
    pending_viewport: bool,
    stale: bool,
}

impl<H> ChartSlot<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn lead(&self) -> Lead {
        self.lead
    }

    pub fn viewport(&self) -> XViewport {
        self.viewport
    }

    /// Full data range of the bound series
    pub fn limits(&self) -> XViewport {
        self.limits
    }

    /// Record a window the widget itself moved to (user drag or wheel).
    ///
    /// The window is kept inside the data range; when it had to be moved
    /// back, the corrected window is handed to the widget again.
    pub fn observe_viewport(&mut self, viewport: XViewport) {
        if !viewport.min.is_finite() || !viewport.max.is_finite() {
            self.pending_viewport = true;
            return;
        }
        let clamped = viewport.clamped(self.limits);
        if clamped != viewport {
            self.pending_viewport = true;
        }
        self.viewport = clamped;
    }

    /// Window set through the manager that the widget still has to adopt
    pub fn take_pending_viewport(&mut self) -> Option<XViewport> {
        if self.pending_viewport {
            self.pending_viewport = false;
            Some(self.viewport)
        } else {
            None
        }
    }
}

/// What one `sync` pass did
#[derive(Debug, Default, PartialEq)]
pub struct SyncReport {
    pub created: Vec<Lead>,
    pub destroyed: Vec<Lead>,
    pub skipped: Vec<(Lead, EcgError)>,
}

impl SyncReport {
    pub fn is_quiet(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty() && self.skipped.is_empty()
    }
}

/// Owner of every per-lead chart
pub struct ChartManager<B: ChartBackend> {
    backend: B,
    config: ChartConfig,
    recording: Option<EcgRecording>,
    visible: VisibleLeadSet,
    slots: [Option<ChartSlot<B::Handle>>; LEAD_COUNT],
}

impl<B: ChartBackend> ChartManager<B> {
    pub fn new(backend: B, config: ChartConfig, visible: VisibleLeadSet) -> Self {
        Self {
            backend,
            config,
            recording: None,
            visible,
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn recording(&self) -> Option<&EcgRecording> {
        self.recording.as_ref()
    }

    pub fn visible(&self) -> &VisibleLeadSet {
        &self.visible
    }

    /// Replace the acquired data; every chart is rebuilt on the next sync
    pub fn set_recording(&mut self, recording: Option<EcgRecording>) {
        self.recording = recording;
        self.mark_all_stale();
    }

    fn mark_all_stale(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.stale = true;
        }
    }

    /// Show a hidden lead, or hide a visible one unless it is the last
    pub fn toggle(&mut self, lead: Lead) -> ToggleOutcome {
        let outcome = self.visible.toggle(lead);
        match outcome {
            ToggleOutcome::Removed => {
                self.destroy_chart(lead);
            }
            ToggleOutcome::Rejected => debug!(%lead, "ignored hiding the last visible lead"),
            ToggleOutcome::Added => {}
        }
        outcome
    }

    /// Replace the whole selection, releasing charts of leads no longer shown
    pub fn set_visible(&mut self, visible: VisibleLeadSet) {
        self.visible = visible;
        for lead in Lead::ALL {
            if !visible.contains(lead) {
                self.destroy_chart(lead);
            }
        }
    }

    /// Bring every lead to the state its visibility and surface call for.
    ///
    /// `mounted` reports whether a drawing surface exists for a lead. Leads
    /// that cannot be drawn are skipped and reported; the pass always
    /// continues with the remaining leads.
    pub fn sync(&mut self, mounted: impl Fn(Lead) -> bool) -> SyncReport {
        let mut report = SyncReport::default();

        for lead in Lead::ALL {
            if !self.visible.contains(lead) {
                if self.destroy_chart(lead) {
                    report.destroyed.push(lead);
                }
                continue;
            }

            let up_to_date = self.slots[lead.index()]
                .as_ref()
                .is_some_and(|slot| !slot.stale);
            if up_to_date {
                continue;
            }

            if !mounted(lead) {
                // A stale chart must not outlive the data it was built from
                if self.destroy_chart(lead) {
                    report.destroyed.push(lead);
                }
                debug!(%lead, "surface not mounted yet, skipping");
                report.skipped.push((lead, EcgError::MissingSurface { lead }));
                continue;
            }

            match self.create_chart(lead) {
                Ok(_) => report.created.push(lead),
                Err(error) => {
                    warn!(%lead, %error, "lead not rendered");
                    report.skipped.push((lead, error));
                }
            }
        }

        report
    }

    /// Create the chart for `lead`, destroying any existing one first.
    ///
    /// A lead without data ends up with no chart at all.
    pub fn create_chart(&mut self, lead: Lead) -> EcgResult<&mut ChartSlot<B::Handle>> {
        self.destroy_chart(lead);

        let series = self
            .recording
            .as_ref()
            .ok_or(EcgError::EmptyLeadData { lead })?
            .non_empty_series(lead)?;

        let handle = self.backend.create(series, &self.config);
        let limits = XViewport::full(series.duration());
        debug!(%lead, samples = series.len(), "created chart");

        Ok(self.slots[lead.index()].insert(ChartSlot {
            handle,
            lead,
            limits,
            viewport: limits,
            pending_viewport: false,
            stale: false,
        }))
    }

    /// Release the chart for `lead`; returns whether one existed
    pub fn destroy_chart(&mut self, lead: Lead) -> bool {
        match self.slots[lead.index()].take() {
            Some(slot) => {
                self.backend.destroy(slot.handle);
                debug!(%lead, "destroyed chart");
                true
            }
            None => false,
        }
    }

    /// Release every chart; safe to call repeatedly
    pub fn teardown(&mut self) {
        for lead in Lead::ALL {
            self.destroy_chart(lead);
        }
    }

    pub fn slot(&self, lead: Lead) -> Option<&ChartSlot<B::Handle>> {
        self.slots[lead.index()].as_ref()
    }

    pub fn slot_mut(&mut self, lead: Lead) -> Option<&mut ChartSlot<B::Handle>> {
        self.slots[lead.index()].as_mut()
    }

    pub fn is_rendered(&self, lead: Lead) -> bool {
        self.slots[lead.index()].is_some()
    }

    /// Leads that currently own a chart
    pub fn rendered_leads(&self) -> impl Iterator<Item = Lead> + '_ {
        Lead::ALL.into_iter().filter(|lead| self.is_rendered(*lead))
    }

    pub fn live_charts(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Apply a gesture to one lead's window only
    pub fn apply_gesture(&mut self, lead: Lead, gesture: Gesture) -> bool {
        let min_span = self.config.min_span_s;
        match self.slots[lead.index()].as_mut() {
            Some(slot) => {
                slot.viewport.apply(gesture, slot.limits, min_span);
                slot.pending_viewport = true;
                true
            }
            None => false,
        }
    }
}

impl<B: ChartBackend> Drop for ChartManager<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
