use std::collections::BTreeMap;

use cohort_store::LedgerStore;
use cohort_types::ProposalStatus;
use serde::Serialize;

use crate::engine::Engine;
use crate::error::EngineError;

/// Registry-wide counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub total_proposals: u64,
    /// Whitelist entries across all proposals, proposers included.
    pub total_participants: u64,
    pub by_status: BTreeMap<ProposalStatus, u64>,
    pub ready_to_deploy: u64,
}

impl<S: LedgerStore> Engine<S> {
    pub fn stats(&self) -> Result<EngineStats, EngineError> {
        let mut stats = EngineStats {
            total_proposals: self.store().proposal_count()?,
            ..EngineStats::default()
        };
        for proposal in self.store().iter_proposals()? {
            stats.total_participants += u64::from(proposal.participant_count);
            *stats.by_status.entry(proposal.status).or_default() += 1;
            if proposal.status == ProposalStatus::ThresholdMet {
                stats.ready_to_deploy += 1;
            }
        }
        Ok(stats)
    }
}
