//! Prediction payloads handed over by the external classifier

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};
use ecg_core::{EcgRecording, Prediction};
use ecg_synthesis::{DemoRecorder, DemoRecordingConfig};
use serde::Deserialize;
use tracing::info;

/// JSON body: `{ "label", "probability", "sample_rate"?, "leads": [[mV]] }`
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionPayload {
    pub label: String,
    pub probability: f32,
    #[serde(default)]
    pub sample_rate: Option<f32>,
    /// Lead-major rows in standard 12-lead order
    #[serde(default)]
    pub leads: Vec<Vec<f32>>,
}

/// A prediction with the recording it was made on
#[derive(Debug, Clone)]
pub struct LoadedPrediction {
    pub prediction: Prediction,
    pub recording: EcgRecording,
    /// Where the data came from, for the banner
    pub source: String,
    pub loaded_at: DateTime<Local>,
}

impl PredictionPayload {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Invalid prediction payload")
    }

    pub fn into_loaded(
        self,
        default_sample_rate: f32,
        source: impl Into<String>,
    ) -> anyhow::Result<LoadedPrediction> {
        let prediction = Prediction::new(self.label, self.probability)?;
        let sample_rate = self.sample_rate.unwrap_or(default_sample_rate);
        let recording = EcgRecording::from_matrix(self.leads, sample_rate)?;

        Ok(LoadedPrediction {
            prediction,
            recording,
            source: source.into(),
            loaded_at: Local::now(),
        })
    }
}

/// Read and validate a prediction file
pub fn load_prediction(path: &Path, default_sample_rate: f32) -> anyhow::Result<LoadedPrediction> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let loaded = PredictionPayload::from_json(&text)
        .and_then(|payload| payload.into_loaded(default_sample_rate, path.display().to_string()))
        .with_context(|| format!("Failed to load {}", path.display()))?;

    info!(
        path = %path.display(),
        prediction = %loaded.prediction,
        leads = loaded.recording.lead_count(),
        "loaded prediction"
    );
    Ok(loaded)
}

/// Synthetic recording labelled with its own condition
pub fn demo_prediction(config: &DemoRecordingConfig) -> anyhow::Result<LoadedPrediction> {
    let mut recorder = DemoRecorder::new(config.clone())?;
    let recording = recorder.generate()?;
    let prediction = Prediction::new(config.condition.short_name(), 1.0)?;

    Ok(LoadedPrediction {
        prediction,
        recording,
        source: "demo recording".to_string(),
        loaded_at: Local::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecg_core::{CardiacCondition, EcgError, Lead};

    #[test]
    fn test_payload_defaults_sample_rate() {
        let payload = PredictionPayload::from_json(
            r#"{"label": "MI", "probability": 0.87, "leads": [[0.1, 0.2, 0.3], [], [0.5]]}"#,
        )
        .unwrap();
        let loaded = payload.into_loaded(100.0, "test").unwrap();

        assert_eq!(loaded.prediction.to_string(), "MI (87.0%)");
        assert_eq!(
            loaded.prediction.condition(),
            Some(CardiacCondition::MyocardialInfarction)
        );
        assert_eq!(loaded.recording.sample_rate, 100.0);
        assert_eq!(loaded.recording.lead_count(), 3);
        assert!(loaded.recording.non_empty_series(Lead::II).is_err());
        assert_eq!(loaded.source, "test");
    }

    #[test]
    fn test_payload_sample_rate_override() {
        let payload = PredictionPayload::from_json(
            r#"{"label": "Normal", "probability": 0.5, "sample_rate": 250, "leads": [[0.0]]}"#,
        )
        .unwrap();
        let loaded = payload.into_loaded(100.0, "test").unwrap();
        assert_eq!(loaded.recording.sample_rate, 250.0);
    }

    #[test]
    fn test_invalid_payloads() {
        assert!(PredictionPayload::from_json(r#"{"probability": 0.5}"#).is_err());

        let payload = PredictionPayload::from_json(r#"{"label": "MI", "probability": 1.5}"#).unwrap();
        let error = payload.into_loaded(100.0, "test").unwrap_err();
        assert_eq!(
            error.downcast_ref::<EcgError>(),
            Some(&EcgError::InvalidProbability { value: 1.5 })
        );

        let rows = vec![vec![0.0_f32]; 13];
        let payload = PredictionPayload {
            label: "MI".to_string(),
            probability: 0.5,
            sample_rate: None,
            leads: rows,
        };
        assert!(payload.into_loaded(100.0, "test").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_prediction(Path::new("/nonexistent/prediction.json"), 100.0).is_err());
    }

    #[test]
    fn test_demo_prediction() {
        let config = DemoRecordingConfig {
            condition: CardiacCondition::MyocardialInfarction,
            ..DemoRecordingConfig::default()
        };
        let loaded = demo_prediction(&config).unwrap();
        assert_eq!(loaded.prediction.label, "MI");
        assert_eq!(loaded.recording.lead_count(), 12);
        assert!(Lead::ALL
            .iter()
            .all(|lead| loaded.recording.non_empty_series(*lead).is_ok()));
    }
}
