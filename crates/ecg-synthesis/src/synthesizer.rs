//! Discretized, phase-shifted cardiac cycles

use ecg_core::{CardiacCondition, EcgError, EcgResult, CYCLE_MS};

use crate::waveform::WaveformModel;

/// Phase shift used by the comparison cards
pub const DISPLAY_PHASE_SHIFT_MS: f64 = 200.0;

/// Immutable synthesized signal with its originating parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedSignal {
    samples: Vec<f64>,
    condition: CardiacCondition,
    phase_shift_ms: f64,
}

impl SynthesizedSignal {
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a successfully synthesized signal
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.samples.get(index).copied()
    }

    pub fn condition(&self) -> CardiacCondition {
        self.condition
    }

    pub fn phase_shift_ms(&self) -> f64 {
        self.phase_shift_ms
    }

    /// Samples rotated right by `positions` (left when negative)
    pub fn rotated(&self, positions: isize) -> Vec<f64> {
        let n = self.samples.len().max(1) as isize;
        rotate_right(&self.samples, positions.rem_euclid(n) as usize)
    }

    /// Extreme voltages, used for vertical fitting
    pub fn voltage_range(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| (min.min(v), max.max(v)))
    }
}

/// Right rotation, in `[0, length)`, that a phase shift applies to a
/// `length`-sample cycle. Non-finite shifts rotate by nothing.
pub fn rotation_offset(phase_shift_ms: f64, length: usize) -> usize {
    if length == 0 || !phase_shift_ms.is_finite() {
        return 0;
    }
    let n = length as f64;
    // Reduce before casting so huge shifts never saturate
    let positions = (phase_shift_ms / CYCLE_MS * n).round().rem_euclid(n);
    (positions as usize) % length
}

fn rotate_right(base: &[f64], positions: usize) -> Vec<f64> {
    let n = base.len();
    if n == 0 {
        return Vec::new();
    }
    let positions = positions % n;
    (0..n).map(|i| base[(i + n - positions) % n]).collect()
}

/// Synthesizes cycles from a waveform model
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleSynthesizer {
    model: WaveformModel,
}

impl CycleSynthesizer {
    pub fn new(model: WaveformModel) -> Self {
        Self { model }
    }

    /// One cycle spread over `length` samples (sample `i` sits at
    /// `i * CYCLE_MS / length`), rotated by the phase shift.
    pub fn synthesize(
        &self,
        length: usize,
        phase_shift_ms: f64,
        condition: CardiacCondition,
    ) -> EcgResult<SynthesizedSignal> {
        if length == 0 {
            return Err(EcgError::InvalidLength { length });
        }

        let base = self.base_cycle(length, condition);
        Ok(SynthesizedSignal {
            samples: rotate_right(&base, rotation_offset(phase_shift_ms, length)),
            condition,
            phase_shift_ms,
        })
    }

    /// `beats` repetitions of a `samples_per_beat` cycle, rotated by a phase
    /// shift measured against a single beat
    pub fn synthesize_beats(
        &self,
        beats: usize,
        samples_per_beat: usize,
        phase_shift_ms: f64,
        condition: CardiacCondition,
    ) -> EcgResult<SynthesizedSignal> {
        let length = beats.saturating_mul(samples_per_beat);
        if length == 0 {
            return Err(EcgError::InvalidLength { length });
        }

        let beat = self.base_cycle(samples_per_beat, condition);
        let strip: Vec<f64> = beat.iter().copied().cycle().take(length).collect();
        Ok(SynthesizedSignal {
            samples: rotate_right(&strip, rotation_offset(phase_shift_ms, samples_per_beat)),
            condition,
            phase_shift_ms,
        })
    }

    fn base_cycle(&self, length: usize, condition: CardiacCondition) -> Vec<f64> {
        let step_ms = CYCLE_MS / length as f64;
        (0..length)
            .map(|i| self.model.voltage_at(i as f64 * step_ms, condition))
            .collect()
    }
}

/// Synthesize one standard cycle
pub fn synthesize(
    length: usize,
    phase_shift_ms: f64,
    condition: CardiacCondition,
) -> EcgResult<SynthesizedSignal> {
    CycleSynthesizer::default().synthesize(length, phase_shift_ms, condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-6, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            synthesize(0, 0.0, CardiacCondition::Normal),
            Err(EcgError::InvalidLength { length: 0 })
        );
        let synthesizer = CycleSynthesizer::default();
        assert!(synthesizer
            .synthesize_beats(0, 100, 0.0, CardiacCondition::Normal)
            .is_err());
    }

    #[test]
    fn test_r_peak_is_condition_independent() {
        for condition in CardiacCondition::ALL {
            let signal = synthesize(500, 0.0, condition).unwrap();
            assert_eq!(signal.len(), 500);
            assert_close(signal.samples()[110], 1.5);
        }
    }

    #[test]
    fn test_st_elevation_at_st_midpoint() {
        // ST spans 280-400ms; midpoint 340ms is index 170 of 500
        let mi = synthesize(500, 0.0, CardiacCondition::MyocardialInfarction).unwrap();
        let normal = synthesize(500, 0.0, CardiacCondition::Normal).unwrap();
        assert!(mi.samples()[170] > 0.25);
        assert_close(normal.samples()[170], 0.0);
    }

    #[test]
    fn test_full_rotation_is_identity() {
        for length in [1, 7, 500, 733, 1000] {
            let signal = synthesize(length, 0.0, CardiacCondition::MyocardialInfarction).unwrap();
            assert_eq!(signal.rotated(length as isize), signal.samples());
            assert_eq!(signal.rotated(-(length as isize)), signal.samples());
        }
    }

    #[test]
    fn test_shift_rotates_right() {
        let base = synthesize(1000, 0.0, CardiacCondition::Normal).unwrap();
        let shifted = synthesize(1000, 200.0, CardiacCondition::Normal).unwrap();

        assert_eq!(shifted.phase_shift_ms(), 200.0);
        for i in 0..1000 {
            assert_eq!(shifted.samples()[(i + 200) % 1000], base.samples()[i]);
        }
        // R peak moves from 220ms to 420ms
        assert_close(shifted.samples()[420], 1.5);
    }

    #[test]
    fn test_negative_shift_rotates_left() {
        let base = synthesize(500, 0.0, CardiacCondition::Normal).unwrap();
        let shifted = synthesize(500, -100.0, CardiacCondition::Normal).unwrap();
        assert_eq!(shifted.samples(), base.rotated(-50).as_slice());
        assert_close(shifted.samples()[60], 1.5);
    }

    #[test]
    fn test_shift_beyond_cycle_wraps() {
        let a = synthesize(400, 250.0, CardiacCondition::Normal).unwrap();
        let b = synthesize(400, 1250.0, CardiacCondition::Normal).unwrap();
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_extreme_shifts_stay_in_bounds() {
        let base = synthesize(500, 0.0, CardiacCondition::Normal).unwrap();

        // Whole numbers of cycles, however large, leave the signal unchanged
        for shift in [-1e20, 1e20, -4.0e15] {
            let shifted = synthesize(500, shift, CardiacCondition::Normal).unwrap();
            assert_eq!(shifted.samples(), base.samples(), "shift {shift}");
        }

        for shift in [f64::MAX, f64::MIN, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let shifted = synthesize(500, shift, CardiacCondition::Normal).unwrap();
            assert_eq!(shifted.len(), 500);
        }
        assert_eq!(rotation_offset(f64::NAN, 500), 0);
        assert_eq!(rotation_offset(-100.0, 500), 450);
        assert_eq!(rotation_offset(-0.4, 500), 0);
        assert_eq!(base.rotated(isize::MIN).len(), 500);
    }

    #[test]
    fn test_result_is_permutation_of_base() {
        let base = synthesize(733, 0.0, CardiacCondition::MyocardialInfarction).unwrap();
        let shifted = synthesize(733, 377.0, CardiacCondition::MyocardialInfarction).unwrap();

        let mut a = base.samples().to_vec();
        let mut b = shifted.samples().to_vec();
        a.sort_by(f64::total_cmp);
        b.sort_by(f64::total_cmp);
        assert_eq!(a, b);
    }

    #[test]
    fn test_beats_repeat_the_cycle() {
        let synthesizer = CycleSynthesizer::new(WaveformModel::STANDARD);
        let strip = synthesizer
            .synthesize_beats(3, 100, 0.0, CardiacCondition::Normal)
            .unwrap();
        let single = synthesize(100, 0.0, CardiacCondition::Normal).unwrap();

        assert_eq!(strip.len(), 300);
        for i in 0..300 {
            assert_eq!(strip.samples()[i], single.samples()[i % 100]);
        }
        // R peak of each beat
        for beat in 0..3 {
            assert_close(strip.samples()[beat * 100 + 22], 1.5);
        }
    }

    #[test]
    fn test_voltage_range() {
        let signal = synthesize(1000, 0.0, CardiacCondition::Normal).unwrap();
        let (min, max) = signal.voltage_range();
        assert_close(min, -0.5);
        assert_close(max, 1.5);
    }
}
