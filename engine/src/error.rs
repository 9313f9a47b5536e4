use cohort_store::StoreError;
use cohort_types::{Address, ProposalId, ProposalStatus};
use thiserror::Error;

/// Every engine failure is returned as a value; a failed call leaves state
/// exactly as it was before the call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{caller} is not authorized for this operation on proposal {proposal}")]
    Unauthorized { caller: Address, proposal: ProposalId },

    #[error("{0} not found")]
    NotFound(String),

    #[error("external reference {external_ref:?} is already bound to open proposal {existing}")]
    DuplicateProposal {
        external_ref: String,
        existing: ProposalId,
    },

    #[error("{address} is already whitelisted on proposal {proposal}")]
    DuplicateParticipant {
        proposal: ProposalId,
        address: Address,
    },

    #[error("proposal {proposal} is full ({max} participants)")]
    CapacityExceeded { proposal: ProposalId, max: u32 },

    #[error("proposal {0} is already deployed")]
    AlreadyDeployed(ProposalId),

    #[error("threshold not met: {have} < {need} participants")]
    ThresholdNotMet { have: u32, need: u32 },

    #[error("{address} has already claimed on proposal {proposal}")]
    AlreadyClaimed {
        proposal: ProposalId,
        address: Address,
    },

    #[error("proposal {0} has no participants besides the proposer")]
    NoParticipantsToAllocate(ProposalId),

    #[error("invalid allocation configuration: {0}")]
    InvalidAllocation(String),

    /// A write would move a proposal's status backward.
    #[error("proposal {proposal} cannot move from {from} to {to}")]
    InvalidTransition {
        proposal: ProposalId,
        from: ProposalStatus,
        to: ProposalStatus,
    },

    #[error("proposal {0} is not deployed yet")]
    NotDeployed(ProposalId),

    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Only configuration problems are fatal; everything else is an ordinary
    /// outcome the caller can recover from.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, Self::InvalidAllocation(_) | Self::Config(_))
    }

    pub(crate) fn proposal_not_found(id: ProposalId) -> Self {
        Self::NotFound(format!("proposal {id}"))
    }

    pub(crate) fn participant_not_found(id: ProposalId, address: &Address) -> Self {
        Self::NotFound(format!("participant {address} on proposal {id}"))
    }
}
