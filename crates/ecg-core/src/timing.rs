//! Canonical segment timing table for one cardiac cycle
//!
//! The waveform model and the interval annotation view both read this table,
//! so a segment's millisecond bounds are defined exactly once.

use serde::{Deserialize, Serialize};

/// Nominal length of one cardiac cycle in milliseconds
pub const CYCLE_MS: f64 = 1000.0;

/// Half-open millisecond interval `[start_ms, end_ms)` within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl Interval {
    pub const fn new(start_ms: f64, end_ms: f64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn width(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    pub fn midpoint(&self) -> f64 {
        (self.start_ms + self.end_ms) / 2.0
    }

    pub fn contains(&self, time_ms: f64) -> bool {
        time_ms >= self.start_ms && time_ms < self.end_ms
    }

    /// Fractional position of `time_ms` inside the interval (0 at start, 1 at end)
    pub fn phase(&self, time_ms: f64) -> f64 {
        (time_ms - self.start_ms) / self.width()
    }
}

/// Named physiological segments of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    PWave,
    PrSegment,
    QrsComplex,
    StSegment,
    TWave,
    TpSegment,
}

impl Segment {
    pub const ALL: [Segment; 6] = [
        Segment::PWave,
        Segment::PrSegment,
        Segment::QrsComplex,
        Segment::StSegment,
        Segment::TWave,
        Segment::TpSegment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Segment::PWave => "P Wave",
            Segment::PrSegment => "PR Segment",
            Segment::QrsComplex => "QRS Complex",
            Segment::StSegment => "ST Segment",
            Segment::TWave => "T Wave",
            Segment::TpSegment => "TP Segment",
        }
    }

    /// Physiological event shown in hover text
    pub fn event(&self) -> &'static str {
        match self {
            Segment::PWave => "Atrial Depolarization",
            Segment::PrSegment => "AV Node Delay",
            Segment::QrsComplex => "Ventricular Depolarization",
            Segment::StSegment => "Early Repolarization",
            Segment::TWave => "Ventricular Repolarization",
            Segment::TpSegment => "Diastolic Period",
        }
    }

    /// Longer description for the segment cards
    pub fn description(&self) -> &'static str {
        match self {
            Segment::PWave => {
                "A small bump showing the atria squeezing to push blood into the ventricles."
            }
            Segment::PrSegment => {
                "A brief pause as the signal travels through the AV node before the ventricles fire."
            }
            Segment::QrsComplex => {
                "The sharp spike when the ventricles contract and pump blood out to the body."
            }
            Segment::StSegment => {
                "The flat line after the big spike. If elevation is seen, it may indicate MI."
            }
            Segment::TWave => {
                "A gentle wave showing the ventricles resetting electrically before the next beat."
            }
            Segment::TpSegment => {
                "The resting stretch when the heart is fully relaxed between beats."
            }
        }
    }
}

/// Millisecond bounds of every wave and segment in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentTiming {
    pub p_wave: Interval,
    pub pr_segment: Interval,
    pub q_wave: Interval,
    pub r_wave: Interval,
    pub s_wave: Interval,
    pub st_segment: Interval,
    pub t_wave: Interval,
    pub tp_segment: Interval,
}

impl SegmentTiming {
    /// Standard timing used by the synthesizer and the interval view
    pub const STANDARD: SegmentTiming = SegmentTiming {
        p_wave: Interval::new(0.0, 100.0),
        pr_segment: Interval::new(100.0, 180.0),
        q_wave: Interval::new(180.0, 200.0),
        r_wave: Interval::new(200.0, 240.0),
        s_wave: Interval::new(240.0, 280.0),
        st_segment: Interval::new(280.0, 400.0),
        t_wave: Interval::new(400.0, 600.0),
        tp_segment: Interval::new(600.0, CYCLE_MS),
    };

    /// Whole QRS complex (Q start to S end)
    pub fn qrs_complex(&self) -> Interval {
        Interval::new(self.q_wave.start_ms, self.s_wave.end_ms)
    }

    pub fn interval(&self, segment: Segment) -> Interval {
        match segment {
            Segment::PWave => self.p_wave,
            Segment::PrSegment => self.pr_segment,
            Segment::QrsComplex => self.qrs_complex(),
            Segment::StSegment => self.st_segment,
            Segment::TWave => self.t_wave,
            Segment::TpSegment => self.tp_segment,
        }
    }

    /// Segment containing `time_ms`, after reducing it into the cycle
    pub fn segment_at(&self, time_ms: f64) -> Segment {
        let t = time_ms.rem_euclid(CYCLE_MS);
        Segment::ALL
            .into_iter()
            .find(|segment| self.interval(*segment).contains(t))
            .unwrap_or(Segment::TpSegment)
    }

    /// Every boundary between adjacent pieces, including the sub-waves of QRS
    pub fn boundaries(&self) -> [f64; 8] {
        [
            self.p_wave.start_ms,
            self.pr_segment.start_ms,
            self.q_wave.start_ms,
            self.r_wave.start_ms,
            self.s_wave.start_ms,
            self.st_segment.start_ms,
            self.t_wave.start_ms,
            self.tp_segment.start_ms,
        ]
    }

    /// Card heading such as "P Wave (0-100ms)"
    pub fn heading(&self, segment: Segment) -> String {
        let interval = self.interval(segment);
        format!("{} ({:.0}-{:.0}ms)", segment.label(), interval.start_ms, interval.end_ms)
    }

    /// Hover text for a point on the cycle
    pub fn hover_text(&self, time_ms: f64) -> String {
        let segment = self.segment_at(time_ms);
        format!("{}: {}", segment.label(), segment.event())
    }
}

impl Default for SegmentTiming {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_contiguous() {
        let timing = SegmentTiming::STANDARD;
        let pieces = [
            timing.p_wave,
            timing.pr_segment,
            timing.q_wave,
            timing.r_wave,
            timing.s_wave,
            timing.st_segment,
            timing.t_wave,
            timing.tp_segment,
        ];

        assert_eq!(pieces[0].start_ms, 0.0);
        assert_eq!(pieces[7].end_ms, CYCLE_MS);
        for pair in pieces.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
        }
    }

    #[test]
    fn test_segment_lookup() {
        let timing = SegmentTiming::STANDARD;
        assert_eq!(timing.segment_at(50.0), Segment::PWave);
        assert_eq!(timing.segment_at(100.0), Segment::PrSegment);
        assert_eq!(timing.segment_at(220.0), Segment::QrsComplex);
        assert_eq!(timing.segment_at(340.0), Segment::StSegment);
        assert_eq!(timing.segment_at(500.0), Segment::TWave);
        assert_eq!(timing.segment_at(999.0), Segment::TpSegment);
        // Wraps into the cycle
        assert_eq!(timing.segment_at(1050.0), Segment::PWave);
        assert_eq!(timing.segment_at(-10.0), Segment::TpSegment);
    }

    #[test]
    fn test_headings_follow_table() {
        let timing = SegmentTiming::STANDARD;
        assert_eq!(timing.heading(Segment::QrsComplex), "QRS Complex (180-280ms)");
        assert_eq!(timing.hover_text(450.0), "T Wave: Ventricular Repolarization");
    }
}
