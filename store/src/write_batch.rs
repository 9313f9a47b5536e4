//! Write batching: groups the effects of one engine call so the backend can
//! apply them as a single atomic unit.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.put_participant(key, record);
//! batch.put_ordinal(ordinal_key, address);
//! batch.put_proposal(proposal);
//! store.commit(batch)?;
//! ```
//!
//! A batch that is dropped without being committed has no effect.

use crate::keys::{MembershipKey, OrdinalKey, ParticipantKey};
use crate::records::{ParticipantRecord, ProposalRecord};
use cohort_types::{Address, ProposalId};

/// A single staged write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or replace a proposal record.
    PutProposal(ProposalRecord),
    /// Insert or replace a participant record.
    PutParticipant(ParticipantKey, ParticipantRecord),
    /// Append to the enumeration index. Backends reject an occupied ordinal.
    PutOrdinal(OrdinalKey, Address),
    /// Set a membership flag in the reverse index.
    PutMembership(MembershipKey),
    /// Bind an external reference to a proposal, replacing any old binding.
    BindExternalRef(String, ProposalId),
    /// Set the proposal id counter.
    SetProposalCount(u64),
}

/// An ordered list of staged writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_proposal(&mut self, record: ProposalRecord) {
        self.ops.push(WriteOp::PutProposal(record));
    }

    pub fn put_participant(&mut self, key: ParticipantKey, record: ParticipantRecord) {
        self.ops.push(WriteOp::PutParticipant(key, record));
    }

    pub fn put_ordinal(&mut self, key: OrdinalKey, address: Address) {
        self.ops.push(WriteOp::PutOrdinal(key, address));
    }

    pub fn put_membership(&mut self, key: MembershipKey) {
        self.ops.push(WriteOp::PutMembership(key));
    }

    pub fn bind_external_ref(&mut self, external_ref: impl Into<String>, id: ProposalId) {
        self.ops.push(WriteOp::BindExternalRef(external_ref.into(), id));
    }

    pub fn set_proposal_count(&mut self, count: u64) {
        self.ops.push(WriteOp::SetProposalCount(count));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
