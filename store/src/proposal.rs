//! Proposal storage trait.

use crate::records::ProposalRecord;
use crate::StoreError;
use cohort_types::ProposalId;

/// Read access to the `proposals` table and its bookkeeping.
pub trait ProposalStore {
    /// Get a proposal by id.
    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError>;

    /// Number of proposals ever created (the id counter).
    fn proposal_count(&self) -> Result<u64, StoreError>;

    /// The proposal most recently bound to `external_ref`.
    fn proposal_by_external_ref(&self, external_ref: &str)
        -> Result<Option<ProposalId>, StoreError>;

    /// All proposals, in id order.
    fn iter_proposals(&self) -> Result<Vec<ProposalRecord>, StoreError>;
}
