//! Finalization, payout plans and claim bookkeeping.

use std::collections::BTreeMap;

use cohort_store::{LedgerStore, ParticipantKey, ParticipantRecord, ProposalRecord, WriteBatch};
use cohort_types::{Address, BasisPoints, LogicalTime, ProposalId, ProposalStatus};

use crate::allocation::{split_basis_points, AllocationPlan};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::event::EngineEvent;

impl<S: LedgerStore> Engine<S> {
    /// Fix every non-proposer participant's share of the participant pool.
    ///
    /// Shares sum to exactly 10000. Once finalized, repeated calls return the
    /// stored mapping without recomputing, including after deployment.
    pub fn finalize_allocations(
        &self,
        id: ProposalId,
        caller: &Address,
        now: LogicalTime,
    ) -> Result<BTreeMap<Address, BasisPoints>, EngineError> {
        self.locks().with(id, || {
            let mut proposal = self.load(id)?;
            self.ensure_manager(caller, &proposal)?;

            if proposal.is_finalized() {
                tracing::debug!(proposal = %id, "allocations already final, replaying");
                return self.stored_shares(&proposal);
            }
            match proposal.status {
                ProposalStatus::Gathering => {
                    return Err(EngineError::ThresholdNotMet {
                        have: proposal.participant_count,
                        need: self.config().min_participants,
                    })
                }
                ProposalStatus::Deployed => return Err(EngineError::AlreadyDeployed(id)),
                ProposalStatus::ThresholdMet => {}
            }

            let shares = self.compute_shares(&proposal)?;
            let mapping: BTreeMap<Address, BasisPoints> = shares
                .iter()
                .map(|p| (p.address.clone(), p.allocation_bp))
                .collect();
            let recipients = shares.len() as u32;

            let mut batch = WriteBatch::new();
            for record in shares {
                batch.put_participant(ParticipantKey::new(id, record.address.clone()), record);
            }
            proposal.finalized_at = Some(now);
            batch.put_proposal(proposal);
            self.store().commit(batch)?;

            tracing::info!(proposal = %id, recipients, "allocations finalized");
            self.emit(EngineEvent::AllocationsFinalized {
                proposal: id,
                recipients,
            });
            Ok(mapping)
        })
    }

    /// Non-proposer participants with freshly computed shares, ordinal order.
    pub(crate) fn compute_shares(
        &self,
        proposal: &ProposalRecord,
    ) -> Result<Vec<ParticipantRecord>, EngineError> {
        let mut recipients: Vec<ParticipantRecord> = self
            .store()
            .participants_of(proposal.id)?
            .into_iter()
            .filter(|p| p.address != proposal.proposer)
            .collect();
        let weights: Vec<u64> = recipients
            .iter()
            .map(|p| self.config().split.weight(p))
            .collect();
        let shares = split_basis_points(&weights)
            .ok_or(EngineError::NoParticipantsToAllocate(proposal.id))?;
        for (record, share) in recipients.iter_mut().zip(shares) {
            record.allocation_bp = share;
        }
        Ok(recipients)
    }

    fn stored_shares(
        &self,
        proposal: &ProposalRecord,
    ) -> Result<BTreeMap<Address, BasisPoints>, EngineError> {
        Ok(self
            .store()
            .participants_of(proposal.id)?
            .into_iter()
            .filter(|p| p.address != proposal.proposer)
            .map(|p| (p.address, p.allocation_bp))
            .collect())
    }

    /// The issuer's token table for a proposal.
    ///
    /// Uses the stored shares once finalized; before that it is a preview of
    /// what finalizing now would produce.
    pub fn allocation_plan(&self, id: ProposalId) -> Result<AllocationPlan, EngineError> {
        let proposal = self.load(id)?;
        let participants = if proposal.is_finalized() {
            self.store().participants_of(id)?
        } else {
            self.compute_shares(&proposal)?
        };
        Ok(AllocationPlan::build(
            &proposal,
            &participants,
            &self.config().pools,
            self.config().total_supply(),
            self.config().decimals,
            self.config().verifier.as_ref(),
        ))
    }

    /// Record that the issuer paid out `address`'s allocation.
    ///
    /// Authorization is checked before the roster is consulted, so a caller
    /// who may not claim learns nothing about who is whitelisted.
    pub fn mark_claimed(
        &self,
        id: ProposalId,
        address: &Address,
        caller: &Address,
    ) -> Result<(), EngineError> {
        self.locks().with(id, || {
            let proposal = self.load(id)?;
            if !self.authority().may_claim(caller, address) {
                tracing::warn!(caller = %caller, proposal = %id, "rejected unauthorized claim");
                return Err(EngineError::Unauthorized {
                    caller: caller.clone(),
                    proposal: id,
                });
            }
            let key = ParticipantKey::new(id, address.clone());
            let mut participant = self
                .store()
                .get_participant(&key)?
                .ok_or_else(|| EngineError::participant_not_found(id, address))?;
            if !proposal.is_deployed() {
                return Err(EngineError::NotDeployed(id));
            }
            if participant.claimed {
                return Err(EngineError::AlreadyClaimed {
                    proposal: id,
                    address: address.clone(),
                });
            }

            participant.claimed = true;
            let mut batch = WriteBatch::new();
            batch.put_participant(key, participant);
            self.store().commit(batch)?;

            tracing::info!(proposal = %id, address = %address, "allocation claimed");
            self.emit(EngineEvent::Claimed {
                proposal: id,
                address: address.clone(),
            });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::registry::NewProposal;
    use crate::whitelist::Candidate;
    use cohort_store_mem::MemStore;

    const ALICE: &str = "SPALICE";

    fn engine_with(min: u32, joiners: &[&str]) -> (Engine<MemStore>, ProposalId) {
        let mut config = EngineConfig::new(Address::new("SPADMIN"));
        config.min_participants = min;
        let engine = Engine::new(MemStore::new(), config).unwrap();
        let alice = Address::new(ALICE);
        let id = engine
            .create_proposal(
                NewProposal {
                    external_ref: "post".into(),
                    proposer: alice.clone(),
                    proposer_name: "alice".into(),
                    name: "Crew".into(),
                    symbol: "CRW".into(),
                    description: String::new(),
                },
                LogicalTime::ORIGIN,
            )
            .unwrap();
        for (i, who) in joiners.iter().enumerate() {
            engine
                .add_participant(id, Candidate::new(*who, *who), true, &alice, LogicalTime::new(i as u64 + 1))
                .unwrap();
        }
        (engine, id)
    }

    #[test]
    fn three_way_split_gives_remainder_to_first() {
        let (engine, id) = engine_with(2, &["SPB", "SPC", "SPD"]);
        let shares = engine
            .finalize_allocations(id, &Address::new(ALICE), LogicalTime::new(10))
            .unwrap();
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[&Address::new("SPB")], BasisPoints::new(3334));
        assert_eq!(shares[&Address::new("SPC")], BasisPoints::new(3333));
        assert_eq!(shares[&Address::new("SPD")], BasisPoints::new(3333));
        assert!(!shares.contains_key(&Address::new(ALICE)));
        assert_eq!(
            engine.get_allocation_bp(id, &Address::new(ALICE)).unwrap(),
            BasisPoints::FULL
        );
    }

    #[test]
    fn finalize_is_idempotent() {
        let (engine, id) = engine_with(2, &["SPB", "SPC"]);
        let alice = Address::new(ALICE);
        let first = engine.finalize_allocations(id, &alice, LogicalTime::new(5)).unwrap();
        let second = engine.finalize_allocations(id, &alice, LogicalTime::new(6)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            engine.get_proposal(id).unwrap().finalized_at,
            Some(LogicalTime::new(5))
        );
    }

    #[test]
    fn finalize_before_threshold_fails() {
        let (engine, id) = engine_with(5, &["SPB"]);
        let err = engine
            .finalize_allocations(id, &Address::new(ALICE), LogicalTime::new(2))
            .unwrap_err();
        assert!(matches!(err, EngineError::ThresholdNotMet { have: 2, need: 5 }));
    }

    #[test]
    fn late_join_reopens_finalization() {
        let (engine, id) = engine_with(2, &["SPB", "SPC"]);
        let alice = Address::new(ALICE);
        engine.finalize_allocations(id, &alice, LogicalTime::new(3)).unwrap();
        assert_eq!(
            engine.get_allocation_bp(id, &Address::new("SPB")).unwrap(),
            BasisPoints::new(5000)
        );
        engine
            .add_participant(id, Candidate::new("SPD", "d"), true, &alice, LogicalTime::new(4))
            .unwrap();
        assert!(!engine.get_proposal(id).unwrap().is_finalized());
        for who in ["SPB", "SPC", "SPD"] {
            assert_eq!(
                engine.get_allocation_bp(id, &Address::new(who)).unwrap(),
                BasisPoints::ZERO,
                "{who} kept a stale share"
            );
        }
        assert_eq!(engine.get_allocation_bp(id, &alice).unwrap(), BasisPoints::FULL);
        let shares = engine.finalize_allocations(id, &alice, LogicalTime::new(5)).unwrap();
        assert_eq!(shares.len(), 3);
        assert_eq!(
            shares.values().copied().sum::<BasisPoints>(),
            BasisPoints::FULL
        );
    }

    #[test]
    fn claim_requires_deployment_and_happens_once() {
        let (engine, id) = engine_with(2, &["SPB"]);
        let alice = Address::new(ALICE);
        let bob = Address::new("SPB");
        assert!(matches!(
            engine.mark_claimed(id, &bob, &bob),
            Err(EngineError::NotDeployed(_))
        ));
        engine
            .mark_deployed(id, "SPT.token", "SPT.treasury", &alice, LogicalTime::new(3))
            .unwrap();
        assert!(matches!(
            engine.mark_claimed(id, &bob, &alice),
            Err(EngineError::Unauthorized { .. })
        ));
        engine.mark_claimed(id, &bob, &bob).unwrap();
        assert!(engine.get_participant(id, &bob).unwrap().claimed);
        assert!(matches!(
            engine.mark_claimed(id, &bob, &Address::new("SPADMIN")),
            Err(EngineError::AlreadyClaimed { .. })
        ));
        assert!(matches!(
            engine.mark_claimed(id, &Address::new("SPZ"), &Address::new("SPADMIN")),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn preview_plan_matches_finalized_plan() {
        let (engine, id) = engine_with(2, &["SPB", "SPC", "SPD"]);
        let preview = engine.allocation_plan(id).unwrap();
        engine
            .finalize_allocations(id, &Address::new(ALICE), LogicalTime::new(9))
            .unwrap();
        let finalized = engine.allocation_plan(id).unwrap();
        assert_eq!(preview, finalized);
        assert_eq!(finalized.total(), engine.config().total_supply());
    }

    #[test]
    fn unauthorized_claim_does_not_reveal_membership() {
        let (engine, id) = engine_with(2, &["SPB"]);
        let mallory = Address::new("SPMALLORY");
        for target in ["SPB", "SPNOBODY"] {
            assert!(matches!(
                engine.mark_claimed(id, &Address::new(target), &mallory),
                Err(EngineError::Unauthorized { .. })
            ));
        }
    }
}
