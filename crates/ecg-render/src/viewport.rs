//! Horizontal data window of a chart and the gestures that move it

/// Zoom factor per wheel notch
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Visible x range of one chart, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XViewport {
    pub min: f64,
    pub max: f64,
}

/// Pointer gestures mapped onto the x window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Mouse wheel; positive notches zoom in around `anchor_s`
    Wheel { notches: f64, anchor_s: f64 },
    /// Pinch; `scale > 1` zooms in around `anchor_s`
    Pinch { scale: f64, anchor_s: f64 },
    /// Drag; content moves right by `delta_s`, so the window moves left
    Drag { delta_s: f64 },
    /// Back to the full data range
    Reset,
}

impl XViewport {
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Window covering `[0, duration_s]`
    pub fn full(duration_s: f64) -> Self {
        Self::new(0.0, duration_s.max(0.0))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Shift by `delta_s`, staying inside `limits`
    pub fn pan(&mut self, delta_s: f64, limits: XViewport) {
        self.min += delta_s;
        self.max += delta_s;
        self.clamp_into(limits);
    }

    /// Divide the span by `factor` keeping `anchor_s` fixed on screen
    pub fn zoom(&mut self, factor: f64, anchor_s: f64, limits: XViewport, min_span: f64) {
        if !factor.is_finite() || factor <= 0.0 || self.span() <= 0.0 {
            return;
        }
        let max_span = limits.span();
        let span = (self.span() / factor).max(min_span).min(max_span);
        let anchor = anchor_s.clamp(self.min, self.max);
        let ratio = (anchor - self.min) / self.span();

        self.min = anchor - ratio * span;
        self.max = self.min + span;
        self.clamp_into(limits);
    }

    pub fn apply(&mut self, gesture: Gesture, limits: XViewport, min_span: f64) {
        match gesture {
            Gesture::Wheel { notches, anchor_s } => {
                self.zoom(WHEEL_ZOOM_STEP.powf(notches), anchor_s, limits, min_span)
            }
            Gesture::Pinch { scale, anchor_s } => self.zoom(scale, anchor_s, limits, min_span),
            Gesture::Drag { delta_s } => self.pan(-delta_s, limits),
            Gesture::Reset => *self = limits,
        }
    }

    /// This window moved back inside `limits`, its span capped at theirs
    pub fn clamped(mut self, limits: XViewport) -> Self {
        self.clamp_into(limits);
        self
    }

    fn clamp_into(&mut self, limits: XViewport) {
        let span = self.span().min(limits.span());
        if self.min < limits.min {
            self.min = limits.min;
            self.max = limits.min + span;
        }
        if self.max > limits.max {
            self.max = limits.max;
            self.min = limits.max - span;
        }
    }
}
