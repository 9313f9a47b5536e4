//! Whitelist manager: participant gating, deduplication and quorum detection.

use cohort_store::{
    LedgerStore, MembershipKey, OrdinalKey, ParticipantKey, ParticipantRecord, ProposalRecord,
    WriteBatch,
};
use cohort_types::{Address, BasisPoints, LogicalTime, ProposalId, ProposalStatus};

use crate::engine::{advance_status, Engine};
use crate::error::EngineError;
use crate::event::EngineEvent;

/// Someone asking to join a proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub address: Address,
    pub display_name: String,
    /// Discussion reply the request came from.
    pub source_ref: Option<String>,
}

impl Candidate {
    pub fn new(address: impl Into<Address>, display_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: display_name.into(),
            source_ref: None,
        }
    }

    pub fn with_source(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }
}

impl<S: LedgerStore> Engine<S> {
    /// Whitelist `candidate` on proposal `id` and return the new count.
    ///
    /// The participant count is incremented exactly once per accepted add.
    /// Crossing `min_participants` while `Gathering` moves the proposal to
    /// `ThresholdMet`. Joining after allocations were finalized invalidates
    /// them: every stored share except the proposer's goes back to zero in
    /// the same commit, and the next finalize recomputes.
    pub fn add_participant(
        &self,
        id: ProposalId,
        candidate: Candidate,
        verified: bool,
        caller: &Address,
        now: LogicalTime,
    ) -> Result<u32, EngineError> {
        self.locks().with(id, || {
            let mut proposal = self.load(id)?;
            let key = self.check_admission(&proposal, &candidate, caller)?;

            let ordinal = proposal.participant_count;
            let count = ordinal + 1;
            let record = ParticipantRecord {
                address: candidate.address.clone(),
                display_name: candidate.display_name,
                verified,
                allocation_bp: BasisPoints::ZERO,
                ordinal,
                added_at: now,
                claimed: false,
                source_ref: candidate.source_ref,
            };

            proposal.participant_count = count;
            let crossed = proposal.status == ProposalStatus::Gathering
                && count >= self.config().min_participants;
            if crossed {
                advance_status(&mut proposal, ProposalStatus::ThresholdMet)?;
                proposal.threshold_met_at = Some(now);
            }

            let mut batch = WriteBatch::new();
            let invalidated = proposal.finalized_at.take().is_some();
            if invalidated {
                for mut stale in self.store().participants_of(id)? {
                    if stale.address == proposal.proposer {
                        continue;
                    }
                    stale.allocation_bp = BasisPoints::ZERO;
                    batch.put_participant(ParticipantKey::new(id, stale.address.clone()), stale);
                }
            }
            batch.put_participant(key, record);
            batch.put_ordinal(OrdinalKey::new(id, ordinal), candidate.address.clone());
            batch.put_membership(MembershipKey::new(candidate.address.clone(), id));
            batch.put_proposal(proposal);
            self.store().commit(batch)?;

            tracing::debug!(proposal = %id, address = %candidate.address, verified, count, "participant added");
            if invalidated {
                tracing::info!(proposal = %id, "late join invalidated finalized allocations");
            }
            self.emit(EngineEvent::ParticipantAdded {
                proposal: id,
                address: candidate.address,
                verified,
                count,
            });
            if crossed {
                tracing::info!(proposal = %id, count, "participant threshold met");
                self.emit(EngineEvent::ThresholdMet { proposal: id, count });
            }
            Ok(count)
        })
    }

    /// Everything that must hold for `candidate` to join `proposal`, checked
    /// in the order failures are reported. Returns the candidate's key.
    pub(crate) fn check_admission(
        &self,
        proposal: &ProposalRecord,
        candidate: &Candidate,
        caller: &Address,
    ) -> Result<ParticipantKey, EngineError> {
        let id = proposal.id;
        self.ensure_manager(caller, proposal)?;
        if !proposal.status.accepts_participants() {
            return Err(EngineError::AlreadyDeployed(id));
        }
        let max = self.config().max_participants;
        if proposal.participant_count >= max {
            return Err(EngineError::CapacityExceeded { proposal: id, max });
        }
        candidate
            .address
            .validate()
            .map_err(|_| EngineError::InvalidAddress(candidate.address.to_string()))?;
        let key = ParticipantKey::new(id, candidate.address.clone());
        if self.store().get_participant(&key)?.is_some() {
            return Err(EngineError::DuplicateParticipant {
                proposal: id,
                address: candidate.address.clone(),
            });
        }
        Ok(key)
    }

    pub fn is_whitelisted(&self, id: ProposalId, address: &Address) -> Result<bool, EngineError> {
        let key = ParticipantKey::new(id, address.clone());
        Ok(self.store().get_participant(&key)?.is_some())
    }

    /// Whether the proposal has reached quorum. Unknown proposals fail with
    /// `NotFound`.
    pub fn threshold_met(&self, id: ProposalId) -> Result<bool, EngineError> {
        let proposal = self.load(id)?;
        Ok(proposal.participant_count >= self.config().min_participants)
    }

    pub fn get_participant(
        &self,
        id: ProposalId,
        address: &Address,
    ) -> Result<ParticipantRecord, EngineError> {
        let key = ParticipantKey::new(id, address.clone());
        self.store()
            .get_participant(&key)?
            .ok_or_else(|| EngineError::participant_not_found(id, address))
    }

    /// Stored share of the participant pool; zero until finalized.
    pub fn get_allocation_bp(
        &self,
        id: ProposalId,
        address: &Address,
    ) -> Result<BasisPoints, EngineError> {
        Ok(self.get_participant(id, address)?.allocation_bp)
    }

    /// The address at `ordinal`. `None` past the end of the roster.
    pub fn participant_at(
        &self,
        id: ProposalId,
        ordinal: u32,
    ) -> Result<Option<Address>, EngineError> {
        Ok(self.store().participant_at(id, ordinal)?)
    }

    /// Every participant in join order, proposer first.
    pub fn participants(&self, id: ProposalId) -> Result<Vec<ParticipantRecord>, EngineError> {
        self.load(id)?;
        Ok(self.store().participants_of(id)?)
    }

    /// Proposals `address` is whitelisted on, in id order.
    pub fn proposals_of(&self, address: &Address) -> Result<Vec<ProposalId>, EngineError> {
        Ok(self.store().proposals_of(address)?)
    }

    pub fn verified_count(&self, id: ProposalId) -> Result<u32, EngineError> {
        Ok(self
            .participants(id)?
            .iter()
            .filter(|p| p.verified)
            .count() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::registry::NewProposal;
    use cohort_store::ParticipantStore;
    use cohort_store_mem::MemStore;

    fn setup(min: u32, max: u32) -> (Engine<MemStore>, ProposalId, Address) {
        let mut config = EngineConfig::new(Address::new("SPADMIN"));
        config.min_participants = min;
        config.max_participants = max;
        let engine = Engine::new(MemStore::new(), config).unwrap();
        let proposer = Address::new("SPALICE");
        let id = engine
            .create_proposal(
                NewProposal {
                    external_ref: "post-1".into(),
                    proposer: proposer.clone(),
                    proposer_name: "alice".into(),
                    name: "Builders".into(),
                    symbol: "BLD".into(),
                    description: String::new(),
                },
                LogicalTime::ORIGIN,
            )
            .unwrap();
        (engine, id, proposer)
    }

    #[test]
    fn add_increments_count_once() {
        let (engine, id, alice) = setup(3, 5);
        let count = engine
            .add_participant(id, Candidate::new("SPBOB", "bob"), true, &alice, LogicalTime::new(1))
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(engine.get_proposal(id).unwrap().participant_count, 2);
        assert_eq!(engine.store().count_participants(id).unwrap(), 2);
        assert_eq!(
            engine.participant_at(id, 1).unwrap(),
            Some(Address::new("SPBOB"))
        );
        assert_eq!(engine.participant_at(id, 2).unwrap(), None);
    }

    #[test]
    fn duplicate_is_rejected() {
        let (engine, id, alice) = setup(3, 5);
        engine
            .add_participant(id, Candidate::new("SPBOB", "bob"), false, &alice, LogicalTime::new(1))
            .unwrap();
        let err = engine
            .add_participant(id, Candidate::new("SPBOB", "bob again"), true, &alice, LogicalTime::new(2))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateParticipant { .. }));
        assert_eq!(engine.get_proposal(id).unwrap().participant_count, 2);
    }

    #[test]
    fn proposer_cannot_join_twice() {
        let (engine, id, alice) = setup(3, 5);
        let err = engine
            .add_participant(id, Candidate::new("SPALICE", "me"), true, &alice, LogicalTime::new(1))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateParticipant { .. }));
    }

    #[test]
    fn stranger_cannot_add() {
        let (engine, id, _) = setup(3, 5);
        let err = engine
            .add_participant(
                id,
                Candidate::new("SPBOB", "bob"),
                true,
                &Address::new("SPMALLORY"),
                LogicalTime::new(1),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));
        assert!(!engine.is_whitelisted(id, &Address::new("SPBOB")).unwrap());
    }

    #[test]
    fn admin_can_add() {
        let (engine, id, _) = setup(3, 5);
        engine
            .add_participant(id, Candidate::new("SPBOB", "bob"), true, &Address::new("SPADMIN"), LogicalTime::new(1))
            .unwrap();
        assert!(engine.is_whitelisted(id, &Address::new("SPBOB")).unwrap());
    }

    #[test]
    fn threshold_flips_status_once() {
        let (engine, id, alice) = setup(3, 5);
        engine
            .add_participant(id, Candidate::new("SPB", "b"), true, &alice, LogicalTime::new(1))
            .unwrap();
        assert!(!engine.threshold_met(id).unwrap());
        engine
            .add_participant(id, Candidate::new("SPC", "c"), true, &alice, LogicalTime::new(2))
            .unwrap();
        let proposal = engine.get_proposal(id).unwrap();
        assert_eq!(proposal.status, ProposalStatus::ThresholdMet);
        assert_eq!(proposal.threshold_met_at, Some(LogicalTime::new(2)));
        assert!(engine.threshold_met(id).unwrap());

        engine
            .add_participant(id, Candidate::new("SPD", "d"), true, &alice, LogicalTime::new(3))
            .unwrap();
        let proposal = engine.get_proposal(id).unwrap();
        assert_eq!(proposal.status, ProposalStatus::ThresholdMet);
        assert_eq!(proposal.threshold_met_at, Some(LogicalTime::new(2)));
    }

    #[test]
    fn capacity_is_enforced() {
        let (engine, id, alice) = setup(2, 2);
        engine
            .add_participant(id, Candidate::new("SPB", "b"), true, &alice, LogicalTime::new(1))
            .unwrap();
        let err = engine
            .add_participant(id, Candidate::new("SPC", "c"), true, &alice, LogicalTime::new(2))
            .unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { max: 2, .. }));
    }

    #[test]
    fn malformed_address_is_rejected() {
        let (engine, id, alice) = setup(3, 5);
        let err = engine
            .add_participant(id, Candidate::new("", "nobody"), true, &alice, LogicalTime::new(1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAddress(_)));
    }

    #[test]
    fn unknown_participant_is_not_found() {
        let (engine, id, _) = setup(3, 5);
        assert!(matches!(
            engine.get_participant(id, &Address::new("SPNOBODY")),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            engine.threshold_met(ProposalId::new(99)),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn membership_and_verification_are_tracked() {
        let (engine, id, alice) = setup(3, 5);
        engine
            .add_participant(
                id,
                Candidate::new("SPBOB", "bob").with_source("reply-9"),
                false,
                &alice,
                LogicalTime::new(1),
            )
            .unwrap();
        let bob = engine.get_participant(id, &Address::new("SPBOB")).unwrap();
        assert_eq!(bob.source_ref.as_deref(), Some("reply-9"));
        assert_eq!(bob.allocation_bp, BasisPoints::ZERO);
        assert_eq!(engine.verified_count(id).unwrap(), 1);
        assert_eq!(engine.proposals_of(&Address::new("SPBOB")).unwrap(), vec![id]);
        assert_eq!(engine.proposals_of(&alice).unwrap(), vec![id]);
    }
}
