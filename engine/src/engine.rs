//! The engine facade: one store, one validated configuration, one lock table.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cohort_store::{LedgerStore, ProposalRecord};
use cohort_types::{Address, ProposalId, ProposalStatus};

use crate::auth::Authority;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event::{EngineEvent, EventBus};
use crate::locks::ProposalLocks;

/// The proposal & whitelist allocation engine.
///
/// Operations are split by concern across `registry`, `whitelist` and
/// `finalize`, all as inherent methods on this type. Every mutating call
/// takes the lock of the proposal it touches, checks all preconditions,
/// stages its writes in one batch and commits it; a call that fails returns
/// before anything is committed.
///
/// `Engine` is `Send + Sync` when the store is, so it can be shared behind an
/// `Arc`. Calls on different proposals proceed in parallel.
pub struct Engine<S> {
    store: S,
    config: EngineConfig,
    authority: Authority,
    locks: ProposalLocks,
    /// Serialises proposal creation (id counter and external-ref bindings).
    creation: Mutex<()>,
    events: EventBus,
}

impl<S: LedgerStore> Engine<S> {
    /// Validate `config` and build an engine over `store`.
    ///
    /// Fails with [`EngineError::InvalidAllocation`] if the pool constants do
    /// not sum to 10000; the engine must not start in that case.
    pub fn new(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "refusing to start with invalid configuration");
            return Err(e);
        }
        tracing::info!(
            admin = %config.admin,
            min_participants = config.min_participants,
            max_participants = config.max_participants,
            total_supply = config.total_supply,
            "allocation engine ready"
        );
        Ok(Self {
            store,
            authority: Authority::new(config.admin.clone()),
            config,
            locks: ProposalLocks::new(),
            creation: Mutex::new(()),
            events: EventBus::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Register an event listener. Must be done before the engine is shared.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&EngineEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub(crate) fn locks(&self) -> &ProposalLocks {
        &self.locks
    }

    pub(crate) fn creation_guard(&self) -> MutexGuard<'_, ()> {
        self.creation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn emit(&self, event: EngineEvent) {
        self.events.emit(&event);
    }

    /// Load a proposal or fail with `NotFound`.
    pub(crate) fn load(&self, id: ProposalId) -> Result<ProposalRecord, EngineError> {
        self.store
            .get_proposal(id)?
            .ok_or_else(|| EngineError::proposal_not_found(id))
    }

    pub(crate) fn ensure_manager(
        &self,
        caller: &Address,
        proposal: &ProposalRecord,
    ) -> Result<(), EngineError> {
        if self.authority.may_manage(caller, proposal) {
            return Ok(());
        }
        tracing::warn!(caller = %caller, proposal = %proposal.id, "rejected unauthorized call");
        Err(EngineError::Unauthorized {
            caller: caller.clone(),
            proposal: proposal.id,
        })
    }
}

/// Set `proposal.status` to `next`. Status only moves forward.
pub(crate) fn advance_status(
    proposal: &mut ProposalRecord,
    next: ProposalStatus,
) -> Result<(), EngineError> {
    if !proposal.status.can_advance_to(next) {
        return Err(EngineError::InvalidTransition {
            proposal: proposal.id,
            from: proposal.status,
            to: next,
        });
    }
    proposal.status = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NewProposal;
    use cohort_store_mem::MemStore;
    use cohort_types::LogicalTime;

    #[test]
    fn deployed_status_cannot_be_rewound() {
        let engine = Engine::new(MemStore::new(), EngineConfig::new(Address::new("SPADMIN"))).unwrap();
        let id = engine
            .create_proposal(
                NewProposal {
                    external_ref: "post".into(),
                    proposer: Address::new("SPALICE"),
                    proposer_name: "alice".into(),
                    name: "Crew".into(),
                    symbol: "CRW".into(),
                    description: String::new(),
                },
                LogicalTime::ORIGIN,
            )
            .unwrap();
        let mut proposal = engine.get_proposal(id).unwrap();
        advance_status(&mut proposal, ProposalStatus::Deployed).unwrap();
        advance_status(&mut proposal, ProposalStatus::Deployed).unwrap();
        let err = advance_status(&mut proposal, ProposalStatus::ThresholdMet).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: ProposalStatus::Deployed,
                to: ProposalStatus::ThresholdMet,
                ..
            }
        ));
        assert_eq!(proposal.status, ProposalStatus::Deployed);
    }
}
