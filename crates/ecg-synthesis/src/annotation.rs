//! Wave feature annotations for label placement on a synthesized trace

use ecg_core::{SegmentTiming, CYCLE_MS};
use serde::{Deserialize, Serialize};

use crate::synthesizer::{SynthesizedSignal, DISPLAY_PHASE_SHIFT_MS};

/// Named wave features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureLabel {
    P,
    Q,
    R,
    S,
    T,
}

/// Which side of the trace a label is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    Above,
    Below,
}

impl FeatureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureLabel::P => "P",
            FeatureLabel::Q => "Q",
            FeatureLabel::R => "R",
            FeatureLabel::S => "S",
            FeatureLabel::T => "T",
        }
    }

    /// Q and S sit below the trace, P, R and T above
    pub fn placement(&self) -> LabelPlacement {
        match self {
            FeatureLabel::Q | FeatureLabel::S => LabelPlacement::Below,
            FeatureLabel::P | FeatureLabel::R | FeatureLabel::T => LabelPlacement::Above,
        }
    }
}

impl std::fmt::Display for FeatureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature time within the 0-1000 ms display frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub label: FeatureLabel,
    pub time_ms: f64,
}

impl Annotation {
    /// Feature times of `timing`'s cycle as displayed with `phase_shift_ms`:
    /// mid P, Q nadir, R peak, S nadir, mid T
    pub fn table(timing: &SegmentTiming, phase_shift_ms: f64) -> [Annotation; 5] {
        let at = |label, time_ms: f64| Annotation {
            label,
            time_ms: (time_ms + phase_shift_ms).rem_euclid(CYCLE_MS),
        };
        [
            at(FeatureLabel::P, timing.p_wave.midpoint()),
            at(FeatureLabel::Q, timing.q_wave.end_ms),
            at(FeatureLabel::R, timing.r_wave.midpoint()),
            at(FeatureLabel::S, timing.s_wave.start_ms),
            at(FeatureLabel::T, timing.t_wave.midpoint()),
        ]
    }

    /// The fixed table used for label placement: the standard cycle in the
    /// `DISPLAY_PHASE_SHIFT_MS` frame
    pub fn canonical() -> [Annotation; 5] {
        Self::table(&SegmentTiming::STANDARD, DISPLAY_PHASE_SHIFT_MS)
    }
}

/// An annotation resolved against a concrete signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedAnnotation {
    pub label: FeatureLabel,
    pub sample_index: usize,
    pub voltage: f64,
}

impl LocatedAnnotation {
    pub fn placement(&self) -> LabelPlacement {
        self.label.placement()
    }
}

/// Sample index of `time_ms` in a `length`-sample cycle, clamped into range
pub fn sample_index_for(time_ms: f64, length: usize) -> usize {
    let max_index = length.saturating_sub(1);
    let index = (time_ms / CYCLE_MS * length as f64).round();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(max_index)
    }
}

/// Resolve the canonical annotations against the (already shifted) samples
pub fn locate(signal: &SynthesizedSignal) -> Vec<LocatedAnnotation> {
    locate_with(signal, &Annotation::canonical())
}

pub fn locate_with(signal: &SynthesizedSignal, annotations: &[Annotation]) -> Vec<LocatedAnnotation> {
    if signal.is_empty() {
        return Vec::new();
    }

    annotations
        .iter()
        .map(|annotation| {
            let sample_index = sample_index_for(annotation.time_ms, signal.len());
            LocatedAnnotation {
                label: annotation.label,
                sample_index,
                voltage: signal.samples()[sample_index],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::{rotation_offset, synthesize, DISPLAY_PHASE_SHIFT_MS};
    use ecg_core::CardiacCondition;

    #[test]
    fn test_placement_rule() {
        let below: Vec<_> = Annotation::canonical()
            .iter()
            .filter(|a| a.label.placement() == LabelPlacement::Below)
            .map(|a| a.label)
            .collect();
        assert_eq!(below, vec![FeatureLabel::Q, FeatureLabel::S]);
    }

    #[test]
    fn test_index_clamped() {
        assert_eq!(sample_index_for(1000.0, 500), 499);
        assert_eq!(sample_index_for(-20.0, 500), 0);
        assert_eq!(sample_index_for(420.0, 500), 210);
        assert_eq!(sample_index_for(999.0, 1), 0);
    }

    #[test]
    fn test_annotations_read_shifted_signal() {
        for shift in [0.0, 120.0, -333.0, DISPLAY_PHASE_SHIFT_MS] {
            let signal = synthesize(600, shift, CardiacCondition::MyocardialInfarction).unwrap();
            let base = synthesize(600, 0.0, CardiacCondition::MyocardialInfarction).unwrap();
            let rotated = base.rotated(rotation_offset(shift, 600) as isize);

            for located in locate(&signal) {
                assert_eq!(located.voltage, rotated[located.sample_index]);
                assert_eq!(located.voltage, signal.samples()[located.sample_index]);
            }
        }
    }

    #[test]
    fn test_canonical_table_follows_segment_timing() {
        let times: Vec<(FeatureLabel, f64)> = Annotation::canonical()
            .iter()
            .map(|a| (a.label, a.time_ms))
            .collect();
        assert_eq!(
            times,
            vec![
                (FeatureLabel::P, 250.0),
                (FeatureLabel::Q, 400.0),
                (FeatureLabel::R, 420.0),
                (FeatureLabel::S, 440.0),
                (FeatureLabel::T, 700.0),
            ]
        );

        // Shifting the table wraps into the cycle
        let wrapped = Annotation::table(&SegmentTiming::STANDARD, 900.0);
        assert_eq!(wrapped[4].time_ms, 400.0);
    }

    #[test]
    fn test_display_shift_lands_on_features() {
        for length in [500, 1000] {
            for condition in CardiacCondition::ALL {
                let signal = synthesize(length, DISPLAY_PHASE_SHIFT_MS, condition).unwrap();
                let located = locate(&signal);

                let voltage = |label: FeatureLabel| {
                    located.iter().find(|a| a.label == label).unwrap().voltage
                };
                assert!((voltage(FeatureLabel::P) - 0.25).abs() < 1e-9);
                assert!((voltage(FeatureLabel::Q) + 0.2).abs() < 1e-9);
                assert!((voltage(FeatureLabel::R) - 1.5).abs() < 1e-9);
                assert!((voltage(FeatureLabel::S) + 0.5).abs() < 1e-9);
                assert!((voltage(FeatureLabel::T) - 0.35).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_table_matches_signal_shift() {
        // A table built for the signal's own shift labels the same waves
        let signal = synthesize(1000, 0.0, CardiacCondition::Normal).unwrap();
        let table = Annotation::table(&SegmentTiming::STANDARD, signal.phase_shift_ms());
        let located = locate_with(&signal, &table);
        assert!((located[2].voltage - 1.5).abs() < 1e-9);
        assert!((located[3].voltage + 0.5).abs() < 1e-9);
    }
}
