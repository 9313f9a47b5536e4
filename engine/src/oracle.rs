//! Verification oracle seam.
//!
//! The verifier decides whether a candidate counts as verified. Its verdict is
//! taken once, when the candidate is added, and never re-checked.

use cohort_store::LedgerStore;
use cohort_types::{Address, LogicalTime, ProposalId};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::whitelist::Candidate;

/// Answers "is this address verified for this proposal".
pub trait VerificationOracle {
    fn is_verified(&self, proposal: ProposalId, address: &Address) -> bool;
}

impl<F> VerificationOracle for F
where
    F: Fn(ProposalId, &Address) -> bool,
{
    fn is_verified(&self, proposal: ProposalId, address: &Address) -> bool {
        self(proposal, address)
    }
}

impl<S: LedgerStore> Engine<S> {
    /// Ask `oracle` about `candidate`, then whitelist it with that verdict.
    ///
    /// The oracle is only consulted once the caller is allowed to add and the
    /// candidate could join right now.
    pub fn submit_candidate(
        &self,
        id: ProposalId,
        candidate: Candidate,
        oracle: &dyn VerificationOracle,
        caller: &Address,
        now: LogicalTime,
    ) -> Result<u32, EngineError> {
        let proposal = self.load(id)?;
        self.check_admission(&proposal, &candidate, caller)?;
        let verified = oracle.is_verified(id, &candidate.address);
        tracing::debug!(proposal = %id, address = %candidate.address, verified, "verifier verdict");
        self.add_participant(id, candidate, verified, caller, now)
    }
}
