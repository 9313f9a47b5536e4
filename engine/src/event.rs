//! Events emitted after each committed state change.

use cohort_types::{Address, ProposalId};

/// Engine-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// A proposal was created with its proposer as participant #0.
    ProposalCreated {
        proposal: ProposalId,
        proposer: Address,
    },
    /// A participant joined the whitelist.
    ParticipantAdded {
        proposal: ProposalId,
        address: Address,
        verified: bool,
        count: u32,
    },
    /// The participant count reached the quorum. Fires once per proposal.
    ThresholdMet { proposal: ProposalId, count: u32 },
    /// Participant shares were fixed.
    AllocationsFinalized {
        proposal: ProposalId,
        recipients: u32,
    },
    /// The proposal was deployed.
    Deployed {
        proposal: ProposalId,
        token_ref: String,
        treasury_ref: String,
    },
    /// The issuer reported a payout.
    Claimed {
        proposal: ProposalId,
        address: Address,
    },
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the calling thread while the proposal lock
/// is held; keep handlers fast and never call back into the engine.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&EngineEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&EngineEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &EngineEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn every_listener_sees_every_event() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..2 {
            let seen = Arc::clone(&seen);
            bus.subscribe(Box::new(move |e: &EngineEvent| seen.lock().unwrap().push(e.clone())));
        }
        let event = EngineEvent::ThresholdMet {
            proposal: ProposalId::new(1),
            count: 10,
        };
        bus.emit(&event);
        assert_eq!(*seen.lock().unwrap(), vec![event.clone(), event]);
    }
}
