//! Seeded synthetic 12-lead recording for running the dashboard without a
//! prediction service

use ecg_core::{CardiacCondition, EcgError, EcgRecording, EcgResult, Lead, DEFAULT_SAMPLE_RATE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::synthesizer::CycleSynthesizer;

/// Configuration for the demo recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoRecordingConfig {
    /// Condition of every beat
    pub condition: CardiacCondition,
    /// Sample rate in Hz; one beat lasts one second
    pub sample_rate: f32,
    /// Number of beats per lead
    pub beats: usize,
    /// Gaussian noise standard deviation in mV (0.0 = clean)
    pub noise_std: f32,
    /// Baseline wander amplitude in mV
    pub baseline_wander: f32,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for DemoRecordingConfig {
    fn default() -> Self {
        Self {
            condition: CardiacCondition::Normal,
            sample_rate: DEFAULT_SAMPLE_RATE,
            beats: 10,
            noise_std: 0.02,
            baseline_wander: 0.03,
            seed: Some(42),
        }
    }
}

/// Rough projection of the cardiac vector onto each lead
fn lead_gain(lead: Lead) -> f64 {
    match lead {
        Lead::I => 0.6,
        Lead::II => 1.0,
        Lead::III => 0.4,
        Lead::AVr => -0.8,
        Lead::AVl => 0.2,
        Lead::AVf => 0.7,
        Lead::V1 => -0.4,
        Lead::V2 => 0.3,
        Lead::V3 => 0.7,
        Lead::V4 => 1.1,
        Lead::V5 => 1.0,
        Lead::V6 => 0.8,
    }
}

/// Generates demo recordings from the cycle synthesizer
pub struct DemoRecorder {
    config: DemoRecordingConfig,
    synthesizer: CycleSynthesizer,
    rng: StdRng,
    noise: Normal<f32>,
}

impl DemoRecorder {
    pub fn new(config: DemoRecordingConfig) -> EcgResult<Self> {
        if !config.sample_rate.is_finite() || config.sample_rate < 1.0 {
            return Err(EcgError::InvalidSampleRate { rate: config.sample_rate });
        }
        if config.beats == 0 {
            return Err(EcgError::InvalidLength { length: 0 });
        }

        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|_| EcgError::InvalidNoiseLevel { std_dev: config.noise_std })?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(DemoRecorder {
            config,
            synthesizer: CycleSynthesizer::default(),
            rng,
            noise,
        })
    }

    pub fn config(&self) -> &DemoRecordingConfig {
        &self.config
    }

    /// Generate all 12 leads
    pub fn generate(&mut self) -> EcgResult<EcgRecording> {
        let samples_per_beat = self.config.sample_rate.round() as usize;
        let strip = self.synthesizer.synthesize_beats(
            self.config.beats,
            samples_per_beat,
            0.0,
            self.config.condition,
        )?;

        let dt = 1.0 / self.config.sample_rate;
        let mut rows = Vec::with_capacity(Lead::ALL.len());
        for lead in Lead::ALL {
            let gain = lead_gain(lead);
            let wander_phase = lead.index() as f32 * 0.5;

            let row = strip
                .samples()
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let time = i as f32 * dt;
                    let wander = self.config.baseline_wander
                        * (2.0 * std::f32::consts::PI * 0.15 * time + wander_phase).sin();
                    (v * gain) as f32 + wander + self.noise.sample(&mut self.rng)
                })
                .collect();
            rows.push(row);
        }

        EcgRecording::from_matrix(rows, self.config.sample_rate)
    }
}
