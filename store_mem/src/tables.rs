//! The table set behind [`crate::MemStore`].

use crate::MemStoreError;
use cohort_store::{
    MembershipKey, OrdinalKey, ParticipantKey, ParticipantRecord, ProposalRecord, WriteBatch,
    WriteOp,
};
use cohort_types::{Address, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// All persisted state. Every container is ordered so the `bincode`
/// encoding of equal states is byte-identical.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    pub proposals: BTreeMap<ProposalId, ProposalRecord>,
    pub participants: BTreeMap<ParticipantKey, ParticipantRecord>,
    pub enumeration: BTreeMap<OrdinalKey, Address>,
    pub reverse: BTreeSet<MembershipKey>,
    pub external_refs: BTreeMap<String, ProposalId>,
    pub proposal_count: u64,
}

impl Tables {
    /// Reject the batch if any op conflicts with current state or with an
    /// earlier op in the same batch. Nothing is written.
    pub fn check(&self, batch: &WriteBatch) -> Result<(), MemStoreError> {
        let mut staged = BTreeSet::new();
        for op in batch.ops() {
            if let WriteOp::PutOrdinal(key, _) = op {
                if self.enumeration.contains_key(key) || !staged.insert(*key) {
                    return Err(MemStoreError::OrdinalTaken {
                        proposal: key.proposal.get(),
                        ordinal: key.ordinal,
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply a batch that has passed [`Tables::check`].
    pub fn apply(&mut self, batch: WriteBatch) {
        for op in batch.into_ops() {
            match op {
                WriteOp::PutProposal(record) => {
                    self.proposals.insert(record.id, record);
                }
                WriteOp::PutParticipant(key, record) => {
                    self.participants.insert(key, record);
                }
                WriteOp::PutOrdinal(key, address) => {
                    self.enumeration.insert(key, address);
                }
                WriteOp::PutMembership(key) => {
                    self.reverse.insert(key);
                }
                WriteOp::BindExternalRef(external_ref, id) => {
                    self.external_refs.insert(external_ref, id);
                }
                WriteOp::SetProposalCount(count) => {
                    self.proposal_count = count;
                }
            }
        }
    }
}
