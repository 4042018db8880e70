//! Acquired 12-lead ECG data as handed over by the external predictor

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::condition::CardiacCondition;
use crate::error::{EcgError, EcgResult};

/// Sample rate used when the predictor does not report one
pub const DEFAULT_SAMPLE_RATE: f32 = 100.0;

/// Number of leads in a standard ECG
pub const LEAD_COUNT: usize = 12;

/// The 12 standard ECG leads, in conventional order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lead {
    I,
    II,
    III,
    #[serde(rename = "aVR")]
    AVr,
    #[serde(rename = "aVL")]
    AVl,
    #[serde(rename = "aVF")]
    AVf,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

impl Lead {
    pub const ALL: [Lead; LEAD_COUNT] = [
        Lead::I,
        Lead::II,
        Lead::III,
        Lead::AVr,
        Lead::AVl,
        Lead::AVf,
        Lead::V1,
        Lead::V2,
        Lead::V3,
        Lead::V4,
        Lead::V5,
        Lead::V6,
    ];

    /// Position of the lead in the 12-lead matrix (0-11)
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Lead> {
        Lead::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Lead::I => "I",
            Lead::II => "II",
            Lead::III => "III",
            Lead::AVr => "aVR",
            Lead::AVl => "aVL",
            Lead::AVf => "aVF",
            Lead::V1 => "V1",
            Lead::V2 => "V2",
            Lead::V3 => "V3",
            Lead::V4 => "V4",
            Lead::V5 => "V5",
            Lead::V6 => "V6",
        }
    }

    /// Chart heading: limb leads are prefixed with "Lead"
    pub fn title(&self) -> String {
        match self {
            Lead::I | Lead::II | Lead::III => format!("Lead {}", self.name()),
            _ => self.name().to_string(),
        }
    }
}

impl std::fmt::Display for Lead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Lead {
    type Err = EcgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix("Lead ").unwrap_or(trimmed);
        Lead::ALL
            .into_iter()
            .find(|lead| lead.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EcgError::UnknownLead { name: s.to_string() })
    }
}

/// Acquired sample sequence for one lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSeries {
    pub lead: Lead,
    /// Sample rate in Hz
    pub sample_rate: f32,
    /// Amplitude samples in mV
    pub samples: Vec<f32>,
}

impl LeadSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Elapsed time of a sample in seconds
    pub fn time_at(&self, sample_index: usize) -> f64 {
        sample_index as f64 / self.sample_rate as f64
    }

    /// Duration covered by the samples in seconds
    pub fn duration(&self) -> f64 {
        self.time_at(self.samples.len())
    }

    /// `[time_s, amplitude_mv]` pairs for plotting
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, &v)| [self.time_at(i), v as f64])
            .collect()
    }

    /// Amplitude range, or `None` for an empty series
    pub fn amplitude_range(&self) -> Option<(f32, f32)> {
        if self.samples.is_empty() {
            return None;
        }
        let min = self.samples.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        let max = self.samples.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        Some((min, max))
    }
}

/// A full acquisition: up to 12 lead series sharing one sample rate
#[derive(Debug, Clone)]
pub struct EcgRecording {
    /// Unique identifier for this recording session
    pub id: Uuid,
    /// Sample rate in Hz shared by all leads
    pub sample_rate: f32,
    /// Series in lead order; rows beyond those supplied are absent
    pub leads: Vec<LeadSeries>,
}

impl EcgRecording {
    /// Build a recording from a lead-major matrix (row `i` is `Lead::ALL[i]`)
    pub fn from_matrix(rows: Vec<Vec<f32>>, sample_rate: f32) -> EcgResult<Self> {
        if rows.len() > LEAD_COUNT {
            return Err(EcgError::TooManyLeads {
                count: rows.len(),
                max: LEAD_COUNT,
            });
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EcgError::InvalidSampleRate { rate: sample_rate });
        }

        let leads = rows
            .into_iter()
            .zip(Lead::ALL)
            .map(|(samples, lead)| LeadSeries {
                lead,
                sample_rate,
                samples,
            })
            .collect();

        Ok(EcgRecording {
            id: Uuid::new_v4(),
            sample_rate,
            leads,
        })
    }

    /// Series for a lead, if the predictor supplied that row
    pub fn series(&self, lead: Lead) -> Option<&LeadSeries> {
        self.leads.get(lead.index())
    }

    /// Series for a lead, failing with `EmptyLeadData` when absent or empty
    pub fn non_empty_series(&self, lead: Lead) -> EcgResult<&LeadSeries> {
        self.series(lead)
            .filter(|series| !series.is_empty())
            .ok_or(EcgError::EmptyLeadData { lead })
    }

    pub fn lead_count(&self) -> usize {
        self.leads.len()
    }

    /// Longest lead duration in seconds
    pub fn duration(&self) -> f64 {
        self.leads
            .iter()
            .map(LeadSeries::duration)
            .fold(0.0, f64::max)
    }
}

/// Classification handed over by the external predictor, for display only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Confidence in [0, 1]
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f32) -> EcgResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(EcgError::InvalidProbability { value: probability });
        }
        Ok(Prediction {
            label: label.into(),
            probability,
        })
    }

    /// Condition whose reference trace matches the predicted label
    pub fn condition(&self) -> Option<CardiacCondition> {
        let label = self.label.trim().to_ascii_lowercase();
        match label.as_str() {
            "mi" | "stemi" | "myocardial infarction" => Some(CardiacCondition::MyocardialInfarction),
            "normal" | "norm" => Some(CardiacCondition::Normal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.1}%)", self.label, self.probability * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_names_round_trip() {
        for lead in Lead::ALL {
            let parsed: Lead = lead.name().parse().unwrap();
            assert_eq!(parsed, lead);
        }
        assert_eq!("Lead II".parse::<Lead>().unwrap(), Lead::II);
        assert_eq!("avf".parse::<Lead>().unwrap(), Lead::AVf);
        assert!("V7".parse::<Lead>().is_err());
    }

    #[test]
    fn test_lead_index_order() {
        assert_eq!(Lead::I.index(), 0);
        assert_eq!(Lead::AVr.index(), 3);
        assert_eq!(Lead::V6.index(), 11);
        assert_eq!(Lead::from_index(6), Some(Lead::V1));
        assert_eq!(Lead::from_index(12), None);
        assert_eq!(Lead::I.title(), "Lead I");
        assert_eq!(Lead::V3.title(), "V3");
    }

    #[test]
    fn test_recording_from_matrix() {
        let rows = vec![vec![0.0, 0.5, 1.0, 0.5], vec![], vec![0.1; 4]];
        let recording = EcgRecording::from_matrix(rows, DEFAULT_SAMPLE_RATE).unwrap();

        assert_eq!(recording.lead_count(), 3);
        assert_eq!(recording.series(Lead::I).unwrap().len(), 4);
        assert!(recording.series(Lead::V1).is_none());
        assert_eq!(
            recording.non_empty_series(Lead::II),
            Err(EcgError::EmptyLeadData { lead: Lead::II })
        );

        let points = recording.series(Lead::I).unwrap().points();
        assert_eq!(points[2], [0.02, 1.0]);
        assert!((recording.duration() - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_recording_validation() {
        let too_many = vec![vec![0.0]; 13];
        assert_eq!(
            EcgRecording::from_matrix(too_many, 100.0).unwrap_err(),
            EcgError::TooManyLeads { count: 13, max: 12 }
        );
        assert!(EcgRecording::from_matrix(vec![vec![0.0]], 0.0).is_err());
        assert!(EcgRecording::from_matrix(vec![vec![0.0]], f32::NAN).is_err());
    }

    #[test]
    fn test_prediction() {
        let prediction = Prediction::new("MI", 0.873).unwrap();
        assert_eq!(prediction.condition(), Some(CardiacCondition::MyocardialInfarction));
        assert_eq!(format!("{}", prediction), "MI (87.3%)");

        assert_eq!(
            Prediction::new("Normal", 0.4).unwrap().condition(),
            Some(CardiacCondition::Normal)
        );
        assert_eq!(Prediction::new("Other", 0.4).unwrap().condition(), None);
        assert!(Prediction::new("MI", 1.5).is_err());
    }
}
