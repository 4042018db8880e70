//! Error handling for the ECG dashboard core
//!
//! Synthesis errors are returned to the immediate caller. Rendering errors
//! are per lead and never abort sibling leads.

use core::fmt;

use crate::leads::Lead;

/// Result type alias for ECG core operations
pub type EcgResult<T> = Result<T, EcgError>;

/// Error type for all ECG core operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EcgError {
    /// Synthesis requested with a non-positive sample count
    InvalidLength {
        /// Requested sample count
        length: usize,
    },

    /// A render call arrived before a drawing surface exists for the lead
    MissingSurface {
        /// Lead without a mounted surface
        lead: Lead,
    },

    /// A lead's series is absent or has zero samples
    EmptyLeadData {
        /// Lead with no data
        lead: Lead,
    },

    /// More lead rows than the standard 12-lead layout
    TooManyLeads {
        /// Number of rows supplied
        count: usize,
        /// Maximum supported leads
        max: usize,
    },

    /// Sample rate is zero, negative or not finite
    InvalidSampleRate {
        /// Provided sample rate in Hz
        rate: f32,
    },

    /// A lead selection would contain no leads
    EmptyLeadSelection,

    /// Lead name could not be parsed
    UnknownLead {
        /// The unrecognised name
        name: String,
    },

    /// Prediction probability outside [0, 1]
    InvalidProbability {
        /// The rejected value
        value: f32,
    },

    /// Noise standard deviation is negative or not finite
    InvalidNoiseLevel {
        /// The rejected standard deviation
        std_dev: f32,
    },
}

impl fmt::Display for EcgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcgError::InvalidLength { length } => {
                write!(f, "Invalid signal length: {} samples, must be positive", length)
            }
            EcgError::MissingSurface { lead } => {
                write!(f, "No drawing surface mounted for lead {}", lead)
            }
            EcgError::EmptyLeadData { lead } => {
                write!(f, "Lead {} has no samples", lead)
            }
            EcgError::TooManyLeads { count, max } => {
                write!(f, "Too many leads: got {}, max supported {}", count, max)
            }
            EcgError::InvalidSampleRate { rate } => {
                write!(f, "Invalid sample rate: {}Hz", rate)
            }
            EcgError::EmptyLeadSelection => {
                write!(f, "Lead selection must contain at least one lead")
            }
            EcgError::UnknownLead { name } => {
                write!(f, "Unknown lead name: {:?}", name)
            }
            EcgError::InvalidProbability { value } => {
                write!(f, "Invalid probability {}: must be within [0, 1]", value)
            }
            EcgError::InvalidNoiseLevel { std_dev } => {
                write!(f, "Invalid noise level: standard deviation {}", std_dev)
            }
        }
    }
}

impl std::error::Error for EcgError {}

impl EcgError {
    /// Whether the error only means "nothing to draw for this lead right now"
    pub fn is_render_skip(&self) -> bool {
        matches!(self, EcgError::MissingSurface { .. } | EcgError::EmptyLeadData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EcgError::TooManyLeads { count: 15, max: 12 };
        let display = format!("{}", error);
        assert!(display.contains("Too many leads"));
        assert!(display.contains("15"));
        assert!(display.contains("12"));

        let error = EcgError::EmptyLeadData { lead: Lead::AVr };
        assert_eq!(format!("{}", error), "Lead aVR has no samples");
    }

    #[test]
    fn test_render_skip_classification() {
        assert!(EcgError::MissingSurface { lead: Lead::V1 }.is_render_skip());
        assert!(EcgError::EmptyLeadData { lead: Lead::I }.is_render_skip());
        assert!(!EcgError::InvalidLength { length: 0 }.is_render_skip());
    }
}
