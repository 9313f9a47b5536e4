//! Proposal registry: creation, lookup and deployment.

use cohort_store::{
    LedgerStore, MembershipKey, OrdinalKey, ParticipantKey, ParticipantRecord, ProposalRecord,
    StoreError, WriteBatch,
};
use cohort_types::{Address, BasisPoints, LogicalTime, ProposalId, ProposalStatus};

use crate::engine::{advance_status, Engine};
use crate::error::EngineError;
use crate::event::EngineEvent;

/// Input for [`Engine::create_proposal`], as delivered by the discussion
/// listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProposal {
    /// Originating discussion post.
    pub external_ref: String,
    pub proposer: Address,
    /// Display name recorded for the proposer's participant entry.
    pub proposer_name: String,
    pub name: String,
    /// Token ticker; stored upper case.
    pub symbol: String,
    pub description: String,
}

impl<S: LedgerStore> Engine<S> {
    /// Create a proposal in `Gathering` with the proposer as participant #0.
    ///
    /// The proposer holds the full 10000 bp share and is considered verified.
    /// Fails with `DuplicateProposal` while another undeployed proposal is
    /// bound to the same external reference.
    pub fn create_proposal(
        &self,
        new: NewProposal,
        now: LogicalTime,
    ) -> Result<ProposalId, EngineError> {
        if !new.proposer.is_valid() {
            return Err(EngineError::InvalidAddress(new.proposer.to_string()));
        }

        let _creation = self.creation_guard();

        if let Some(existing) = self.store().proposal_by_external_ref(&new.external_ref)? {
            let open = self
                .store()
                .get_proposal(existing)?
                .is_some_and(|p| !p.is_deployed());
            if open {
                return Err(EngineError::DuplicateProposal {
                    external_ref: new.external_ref,
                    existing,
                });
            }
        }

        let count = self.store().proposal_count()?;
        let next = count
            .checked_add(1)
            .ok_or_else(|| StoreError::Corruption("proposal id space exhausted".into()))?;
        let id = ProposalId::new(next);

        let record = ProposalRecord {
            id,
            external_ref: new.external_ref.clone(),
            proposer: new.proposer.clone(),
            name: new.name,
            symbol: new.symbol.to_uppercase(),
            description: new.description,
            participant_count: 1,
            status: ProposalStatus::Gathering,
            token_ref: None,
            treasury_ref: None,
            created_at: now,
            threshold_met_at: None,
            finalized_at: None,
            deployed_at: None,
        };
        let founder = ParticipantRecord {
            address: new.proposer.clone(),
            display_name: new.proposer_name,
            verified: true,
            allocation_bp: BasisPoints::FULL,
            ordinal: 0,
            added_at: now,
            claimed: false,
            source_ref: Some(new.external_ref.clone()),
        };

        let mut batch = WriteBatch::new();
        batch.put_participant(ParticipantKey::new(id, new.proposer.clone()), founder);
        batch.put_ordinal(OrdinalKey::first(id), new.proposer.clone());
        batch.put_membership(MembershipKey::new(new.proposer.clone(), id));
        batch.put_proposal(record);
        batch.bind_external_ref(new.external_ref.clone(), id);
        batch.set_proposal_count(next);
        self.store().commit(batch)?;

        tracing::info!(
            proposal = %id,
            proposer = %new.proposer,
            external_ref = %new.external_ref,
            "proposal created"
        );
        self.emit(EngineEvent::ProposalCreated {
            proposal: id,
            proposer: new.proposer,
        });
        Ok(id)
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<ProposalRecord, EngineError> {
        self.load(id)
    }

    /// The proposal currently bound to a discussion post, if any.
    pub fn proposal_by_external_ref(
        &self,
        external_ref: &str,
    ) -> Result<Option<ProposalRecord>, EngineError> {
        match self.store().proposal_by_external_ref(external_ref)? {
            Some(id) => Ok(self.store().get_proposal(id)?),
            None => Ok(None),
        }
    }

    /// Number of proposals ever created.
    pub fn dao_count(&self) -> Result<u64, EngineError> {
        Ok(self.store().proposal_count()?)
    }

    /// Proposals that have met quorum and await deployment.
    pub fn ready_proposals(&self) -> Result<Vec<ProposalRecord>, EngineError> {
        Ok(self
            .store()
            .iter_proposals()?
            .into_iter()
            .filter(|p| p.status == ProposalStatus::ThresholdMet)
            .collect())
    }

    /// Move a proposal from `ThresholdMet` to `Deployed`.
    ///
    /// Allocations that were not finalized yet are finalized in the same
    /// commit. Token and treasury references are immutable afterwards.
    /// Idle lock slots are released once the call returns.
    pub fn mark_deployed(
        &self,
        id: ProposalId,
        token_ref: impl Into<String>,
        treasury_ref: impl Into<String>,
        caller: &Address,
        now: LogicalTime,
    ) -> Result<(), EngineError> {
        let token_ref = token_ref.into();
        let treasury_ref = treasury_ref.into();
        let deployed = self.locks().with(id, || {
            let mut proposal = self.load(id)?;
            self.ensure_manager(caller, &proposal)?;
            if proposal.is_deployed() {
                return Err(EngineError::AlreadyDeployed(id));
            }
            if proposal.status != ProposalStatus::ThresholdMet
                || proposal.participant_count < self.config().min_participants
            {
                return Err(EngineError::ThresholdNotMet {
                    have: proposal.participant_count,
                    need: self.config().min_participants,
                });
            }

            let mut batch = WriteBatch::new();
            let mut finalized = None;
            if !proposal.is_finalized() {
                let shares = self.compute_shares(&proposal)?;
                finalized = Some(shares.len() as u32);
                for record in shares {
                    batch.put_participant(ParticipantKey::new(id, record.address.clone()), record);
                }
                proposal.finalized_at = Some(now);
            }
            advance_status(&mut proposal, ProposalStatus::Deployed)?;
            proposal.token_ref = Some(token_ref.clone());
            proposal.treasury_ref = Some(treasury_ref.clone());
            proposal.deployed_at = Some(now);
            batch.put_proposal(proposal);
            self.store().commit(batch)?;

            if let Some(recipients) = finalized {
                tracing::info!(proposal = %id, recipients, "allocations finalized at deployment");
                self.emit(EngineEvent::AllocationsFinalized {
                    proposal: id,
                    recipients,
                });
            }
            tracing::info!(proposal = %id, token = %token_ref, treasury = %treasury_ref, "proposal deployed");
            self.emit(EngineEvent::Deployed {
                proposal: id,
                token_ref,
                treasury_ref,
            });
            Ok(())
        });
        self.locks().cleanup();
        deployed
    }
}
