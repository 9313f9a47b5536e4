//! Proposal lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a build proposal. Transitions only move forward:
/// `Gathering -> ThresholdMet -> Deployed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Collecting participants; quorum not yet reached.
    Gathering,
    /// Quorum reached; may still accept participants up to the cap.
    ThresholdMet,
    /// Irreversible: token and treasury references are fixed.
    Deployed,
}

impl ProposalStatus {
    /// Whether new participants may join.
    pub fn accepts_participants(&self) -> bool {
        matches!(self, Self::Gathering | Self::ThresholdMet)
    }

    /// Whether `next` is a legal successor (same status or a later one).
    pub fn can_advance_to(&self, next: ProposalStatus) -> bool {
        next >= *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gathering => "gathering",
            Self::ThresholdMet => "threshold_met",
            Self::Deployed => "deployed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
