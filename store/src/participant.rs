//! Participant storage trait: the `participants`, `enumeration` and
//! `reverse` tables.

use crate::records::ParticipantRecord;
use crate::{ParticipantKey, StoreError};
use cohort_types::{Address, ProposalId};

pub trait ParticipantStore {
    /// Get a single participant.
    fn get_participant(&self, key: &ParticipantKey)
        -> Result<Option<ParticipantRecord>, StoreError>;

    /// Address at `ordinal` in the proposal's enumeration index.
    fn participant_at(&self, proposal: ProposalId, ordinal: u32)
        -> Result<Option<Address>, StoreError>;

    /// Range scan of the enumeration index joined with the participant
    /// table, in ordinal order.
    fn participants_of(&self, proposal: ProposalId) -> Result<Vec<ParticipantRecord>, StoreError>;

    /// Number of distinct addresses in the participant table for `proposal`.
    fn count_participants(&self, proposal: ProposalId) -> Result<u32, StoreError>;

    /// Proposals `address` is a member of, from the reverse index.
    fn proposals_of(&self, address: &Address) -> Result<Vec<ProposalId>, StoreError>;
}
