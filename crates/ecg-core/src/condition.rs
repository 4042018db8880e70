//! Cardiac condition variants for waveform synthesis

use serde::{Deserialize, Serialize};

/// Condition selecting the segment-voltage rule set of a synthesized cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardiacCondition {
    /// Normal sinus beat
    #[default]
    Normal,
    /// Acute myocardial infarction with ST elevation (STEMI)
    MyocardialInfarction,
}

impl CardiacCondition {
    /// Both conditions, in display order
    pub const ALL: [CardiacCondition; 2] =
        [CardiacCondition::Normal, CardiacCondition::MyocardialInfarction];

    /// Short label used on cards and legends
    pub fn short_name(&self) -> &'static str {
        match self {
            CardiacCondition::Normal => "Normal",
            CardiacCondition::MyocardialInfarction => "MI",
        }
    }

    /// Trace colour as 0xRRGGBB
    pub fn trace_rgb(&self) -> u32 {
        match self {
            CardiacCondition::Normal => 0x00a8ff,
            CardiacCondition::MyocardialInfarction => 0xff4757,
        }
    }

    /// Whether the ST interval is elevated for this condition
    pub fn has_st_elevation(&self) -> bool {
        matches!(self, CardiacCondition::MyocardialInfarction)
    }
}

impl std::fmt::Display for CardiacCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardiacCondition::Normal => write!(f, "Normal ECG"),
            CardiacCondition::MyocardialInfarction => write!(f, "Myocardial Infarction (STEMI)"),
        }
    }
}
