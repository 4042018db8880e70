//! Piecewise voltage model of one cardiac cycle

use std::f64::consts::PI;

use ecg_core::{CardiacCondition, SegmentTiming, CYCLE_MS};
use serde::{Deserialize, Serialize};

/// A `(time offset, voltage)` pair within one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleSample {
    /// Offset into the cycle in ms, always in `[0, CYCLE_MS)`
    pub time_offset_ms: f64,
    pub voltage_mv: f64,
}

/// Amplitudes of the individual deflections, in mV
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformShape {
    pub p_amplitude: f64,
    /// Q nadir (negative)
    pub q_depth: f64,
    pub r_peak: f64,
    /// S nadir (negative)
    pub s_depth: f64,
    /// Peak of the ST elevation under myocardial infarction
    pub st_elevation: f64,
    pub t_amplitude: f64,
}

impl WaveformShape {
    pub const STANDARD: WaveformShape = WaveformShape {
        p_amplitude: 0.25,
        q_depth: -0.2,
        r_peak: 1.5,
        s_depth: -0.5,
        st_elevation: 0.3,
        t_amplitude: 0.35,
    };
}

impl Default for WaveformShape {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Timing table plus amplitudes; evaluates voltage at any time offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaveformModel {
    pub timing: SegmentTiming,
    pub shape: WaveformShape,
}

fn half_sine(amplitude: f64, phase: f64) -> f64 {
    amplitude * (PI * phase).sin()
}

fn lerp(from: f64, to: f64, phase: f64) -> f64 {
    from + (to - from) * phase
}

impl WaveformModel {
    pub const STANDARD: WaveformModel = WaveformModel {
        timing: SegmentTiming::STANDARD,
        shape: WaveformShape::STANDARD,
    };

    /// Voltage in mV at `time_ms`, reduced modulo the cycle length first.
    ///
    /// Adjacent pieces meet at the same value: Q ends at the Q nadir where R
    /// starts, R ends at the S nadir where S starts, and every other piece
    /// starts and ends at the baseline.
    pub fn voltage_at(&self, time_ms: f64, condition: CardiacCondition) -> f64 {
        let t = time_ms.rem_euclid(CYCLE_MS);
        let timing = &self.timing;
        let shape = &self.shape;

        if timing.p_wave.contains(t) {
            half_sine(shape.p_amplitude, timing.p_wave.phase(t))
        } else if timing.q_wave.contains(t) {
            lerp(0.0, shape.q_depth, timing.q_wave.phase(t))
        } else if timing.r_wave.contains(t) {
            self.r_wave_at(t)
        } else if timing.s_wave.contains(t) {
            lerp(shape.s_depth, 0.0, timing.s_wave.phase(t))
        } else if timing.st_segment.contains(t) {
            match condition {
                CardiacCondition::Normal => 0.0,
                CardiacCondition::MyocardialInfarction => {
                    half_sine(shape.st_elevation, timing.st_segment.phase(t))
                }
            }
        } else if timing.t_wave.contains(t) {
            // T wave inversion is not modelled; both conditions share it
            half_sine(shape.t_amplitude, timing.t_wave.phase(t))
        } else {
            // PR and TP segments
            0.0
        }
    }

    fn r_wave_at(&self, t: f64) -> f64 {
        let r = self.timing.r_wave;
        let peak_ms = r.midpoint();
        if t < peak_ms {
            lerp(self.shape.q_depth, self.shape.r_peak, (t - r.start_ms) / (peak_ms - r.start_ms))
        } else {
            lerp(self.shape.r_peak, self.shape.s_depth, (t - peak_ms) / (r.end_ms - peak_ms))
        }
    }

    pub fn sample(&self, time_ms: f64, condition: CardiacCondition) -> CycleSample {
        CycleSample {
            time_offset_ms: time_ms.rem_euclid(CYCLE_MS),
            voltage_mv: self.voltage_at(time_ms, condition),
        }
    }

    /// Every piece boundary including the R peak, for continuity checks
    pub fn boundaries(&self) -> Vec<f64> {
        let mut boundaries = self.timing.boundaries().to_vec();
        boundaries.push(self.timing.r_wave.midpoint());
        boundaries.push(CYCLE_MS);
        boundaries
    }
}

/// Voltage of the standard cycle at `time_ms` for the given condition
pub fn voltage_at(time_ms: f64, condition: CardiacCondition) -> f64 {
    WaveformModel::STANDARD.voltage_at(time_ms, condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_continuity_at_every_boundary() {
        let model = WaveformModel::STANDARD;
        for condition in CardiacCondition::ALL {
            for boundary in model.boundaries() {
                let left = model.voltage_at(boundary - 1e-9, condition);
                let right = model.voltage_at(boundary, condition);
                assert!(
                    (left - right).abs() < TOLERANCE,
                    "{condition:?} jumps at {boundary}ms: {left} vs {right}"
                );
            }
        }
    }

    #[test]
    fn test_dense_sweep_has_no_jumps() {
        // Steepest slope is the R downstroke: 2.0 mV over 20 ms
        let max_step = 2.0 / 20.0 * 0.01 + TOLERANCE;
        for condition in CardiacCondition::ALL {
            let mut previous = voltage_at(0.0, condition);
            for i in 1..=100_000 {
                let current = voltage_at(i as f64 * 0.01, condition);
                assert!((current - previous).abs() <= max_step, "jump near {}ms", i as f64 * 0.01);
                previous = current;
            }
        }
    }

    #[test]
    fn test_landmark_amplitudes() {
        for condition in CardiacCondition::ALL {
            assert_close(voltage_at(50.0, condition), 0.25);
            assert_close(voltage_at(140.0, condition), 0.0);
            assert_close(voltage_at(200.0, condition), -0.2);
            assert_close(voltage_at(220.0, condition), 1.5);
            assert_close(voltage_at(240.0, condition), -0.5);
            assert_close(voltage_at(500.0, condition), 0.35);
            assert_close(voltage_at(800.0, condition), 0.0);
        }
    }

    #[test]
    fn test_st_interval_diverges() {
        assert_close(voltage_at(340.0, CardiacCondition::Normal), 0.0);
        assert_close(voltage_at(340.0, CardiacCondition::MyocardialInfarction), 0.3);
        assert!(voltage_at(300.0, CardiacCondition::MyocardialInfarction) > 0.0);
    }

    #[test]
    fn test_t_wave_shared_by_conditions() {
        for t in (400..600).step_by(10) {
            let t = t as f64;
            assert_eq!(
                voltage_at(t, CardiacCondition::Normal),
                voltage_at(t, CardiacCondition::MyocardialInfarction)
            );
        }
    }

    #[test]
    fn test_time_reduced_modulo_cycle() {
        let condition = CardiacCondition::Normal;
        assert_eq!(voltage_at(1220.0, condition), voltage_at(220.0, condition));
        assert_eq!(voltage_at(-780.0, condition), voltage_at(220.0, condition));

        let sample = WaveformModel::STANDARD.sample(2050.0, condition);
        assert_close(sample.time_offset_ms, 50.0);
        assert_close(sample.voltage_mv, 0.25);
    }
}
