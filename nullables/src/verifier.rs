//! Nullable verifier: scripted verdicts instead of a real attestation service.

use cohort_engine::VerificationOracle;
use cohort_types::{Address, ProposalId};
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

/// A verifier that answers from a fixed allow-list.
///
/// Every query is recorded so tests can assert the engine asked exactly once
/// per candidate.
pub struct NullVerifier {
    verified: BTreeSet<Address>,
    default_verdict: bool,
    queries: Mutex<Vec<(ProposalId, Address)>>,
}

impl NullVerifier {
    /// Verifies nobody.
    pub fn new() -> Self {
        Self {
            verified: BTreeSet::new(),
            default_verdict: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Verifies everybody.
    pub fn approving() -> Self {
        Self {
            default_verdict: true,
            ..Self::new()
        }
    }

    /// Verifies exactly `addresses`.
    pub fn allowing<I, A>(addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        Self {
            verified: addresses.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    /// Every `(proposal, address)` asked about, in order.
    pub fn queries(&self) -> Vec<(ProposalId, Address)> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for NullVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationOracle for NullVerifier {
    fn is_verified(&self, proposal: ProposalId, address: &Address) -> bool {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((proposal, address.clone()));
        self.default_verdict || self.verified.contains(address)
    }
}
