//! [`MemStore`]: thread-safe ordered in-memory ledger store.

use crate::tables::Tables;
use crate::MemStoreError;
use cohort_store::{
    LedgerStore, MembershipKey, OrdinalKey, ParticipantKey, ParticipantRecord, ParticipantStore,
    ProposalRecord, ProposalStore, StoreError, WriteBatch,
};
use cohort_types::{Address, ProposalId};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An in-memory ledger store.
///
/// Readers share a lock; [`LedgerStore::commit`] takes it exclusively, checks
/// the whole batch, then applies it, so a failed commit leaves every table
/// untouched.
#[derive(Debug, Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialise the full state.
    pub fn snapshot(&self) -> Result<Vec<u8>, StoreError> {
        let tables = self.read();
        bincode::serialize(&*tables)
            .map_err(|e| MemStoreError::Encode(e.to_string()).into())
    }

    /// Rebuild a store from [`MemStore::snapshot`] output.
    pub fn restore(bytes: &[u8]) -> Result<Self, StoreError> {
        let tables: Tables = bincode::deserialize(bytes).map_err(MemStoreError::from)?;
        tracing::debug!(
            proposals = tables.proposals.len(),
            participants = tables.participants.len(),
            "restored in-memory store from snapshot"
        );
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProposalStore for MemStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError> {
        Ok(self.read().proposals.get(&id).cloned())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(self.read().proposal_count)
    }

    fn proposal_by_external_ref(
        &self,
        external_ref: &str,
    ) -> Result<Option<ProposalId>, StoreError> {
        Ok(self.read().external_refs.get(external_ref).copied())
    }

    fn iter_proposals(&self) -> Result<Vec<ProposalRecord>, StoreError> {
        Ok(self.read().proposals.values().cloned().collect())
    }
}

impl ParticipantStore for MemStore {
    fn get_participant(
        &self,
        key: &ParticipantKey,
    ) -> Result<Option<ParticipantRecord>, StoreError> {
        Ok(self.read().participants.get(key).cloned())
    }

    fn participant_at(
        &self,
        proposal: ProposalId,
        ordinal: u32,
    ) -> Result<Option<Address>, StoreError> {
        Ok(self
            .read()
            .enumeration
            .get(&OrdinalKey::new(proposal, ordinal))
            .cloned())
    }

    fn participants_of(&self, proposal: ProposalId) -> Result<Vec<ParticipantRecord>, StoreError> {
        let tables = self.read();
        tables
            .enumeration
            .range(OrdinalKey::first(proposal)..=OrdinalKey::last(proposal))
            .map(|(key, address)| {
                tables
                    .participants
                    .get(&ParticipantKey::new(proposal, address.clone()))
                    .cloned()
                    .ok_or_else(|| {
                        StoreError::Corruption(format!(
                            "enumeration {} of proposal {} points at missing participant {}",
                            key.ordinal, proposal, address
                        ))
                    })
            })
            .collect()
    }

    fn count_participants(&self, proposal: ProposalId) -> Result<u32, StoreError> {
        let tables = self.read();
        let count = match proposal.next() {
            Some(next) => tables
                .participants
                .range(ParticipantKey::first(proposal)..ParticipantKey::first(next))
                .count(),
            None => tables
                .participants
                .range(ParticipantKey::first(proposal)..)
                .count(),
        };
        u32::try_from(count).map_err(|_| StoreError::Corruption("participant count overflow".into()))
    }

    fn proposals_of(&self, address: &Address) -> Result<Vec<ProposalId>, StoreError> {
        Ok(self
            .read()
            .reverse
            .range(MembershipKey::first(address.clone())..=MembershipKey::last(address.clone()))
            .map(|k| k.proposal)
            .collect())
    }
}

impl LedgerStore for MemStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut tables = self.write();
        tables.check(&batch)?;
        tables.apply(batch);
        Ok(())
    }
}
