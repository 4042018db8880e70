//! Set of leads selected for display

use serde::{Deserialize, Serialize};

use crate::error::{EcgError, EcgResult};
use crate::leads::{Lead, LEAD_COUNT};

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The lead was the only visible one and stays visible
    Rejected,
}

/// Leads currently selected for rendering; never empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Lead>", into = "Vec<Lead>")]
pub struct VisibleLeadSet {
    mask: u16,
}

impl VisibleLeadSet {
    pub fn new(leads: impl IntoIterator<Item = Lead>) -> EcgResult<Self> {
        let mask = leads
            .into_iter()
            .fold(0u16, |mask, lead| mask | Self::bit(lead));
        if mask == 0 {
            return Err(EcgError::EmptyLeadSelection);
        }
        Ok(VisibleLeadSet { mask })
    }

    /// All 12 leads
    pub fn all() -> Self {
        VisibleLeadSet {
            mask: (1u16 << LEAD_COUNT) - 1,
        }
    }

    pub fn single(lead: Lead) -> Self {
        VisibleLeadSet { mask: Self::bit(lead) }
    }

    fn bit(lead: Lead) -> u16 {
        1u16 << lead.index()
    }

    pub fn contains(&self, lead: Lead) -> bool {
        self.mask & Self::bit(lead) != 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn is_all(&self) -> bool {
        self.len() == LEAD_COUNT
    }

    /// Visible leads in lead order
    pub fn iter(&self) -> impl Iterator<Item = Lead> + '_ {
        Lead::ALL.into_iter().filter(move |lead| self.contains(*lead))
    }

    /// Add the lead if hidden; remove it if visible and not the last one
    pub fn toggle(&mut self, lead: Lead) -> ToggleOutcome {
        if !self.contains(lead) {
            self.mask |= Self::bit(lead);
            ToggleOutcome::Added
        } else if self.len() > 1 {
            self.mask &= !Self::bit(lead);
            ToggleOutcome::Removed
        } else {
            ToggleOutcome::Rejected
        }
    }
}

impl Default for VisibleLeadSet {
    fn default() -> Self {
        Self::all()
    }
}

impl TryFrom<Vec<Lead>> for VisibleLeadSet {
    type Error = EcgError;

    fn try_from(leads: Vec<Lead>) -> Result<Self, Self::Error> {
        VisibleLeadSet::new(leads)
    }
}

impl From<VisibleLeadSet> for Vec<Lead> {
    fn from(set: VisibleLeadSet) -> Self {
        set.iter().collect()
    }
}
