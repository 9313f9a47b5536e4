//! Token supply pools.
//!
//! Every deployed proposal splits its total supply into four fixed pools.
//! The split is loaded from configuration and validated once at startup.

use crate::bps::{BasisPoints, BP_SCALE};
use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four supply pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationPool {
    /// Paid to the proposer.
    Founder,
    /// Split among non-proposer participants.
    Participants,
    /// Held by the deployed treasury.
    Treasury,
    /// Paid to the identity verifier.
    Verifier,
}

impl AllocationPool {
    pub const ALL: [AllocationPool; 4] = [
        Self::Founder,
        Self::Participants,
        Self::Treasury,
        Self::Verifier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Founder => "founder",
            Self::Participants => "participant",
            Self::Treasury => "treasury",
            Self::Verifier => "verifier",
        }
    }
}

impl fmt::Display for AllocationPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of total supply assigned to each pool, in basis points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSplit {
    #[serde(default = "default_founder_bp")]
    pub founder_bp: u32,
    #[serde(default = "default_participants_bp")]
    pub participants_bp: u32,
    #[serde(default = "default_treasury_bp")]
    pub treasury_bp: u32,
    #[serde(default = "default_verifier_bp")]
    pub verifier_bp: u32,
}

fn default_founder_bp() -> u32 {
    5000
}

fn default_participants_bp() -> u32 {
    3000
}

fn default_treasury_bp() -> u32 {
    1500
}

fn default_verifier_bp() -> u32 {
    500
}

impl PoolSplit {
    /// The reference configuration: 50% founder, 30% participants,
    /// 15% treasury, 5% verifier.
    pub fn reference() -> Self {
        Self {
            founder_bp: default_founder_bp(),
            participants_bp: default_participants_bp(),
            treasury_bp: default_treasury_bp(),
            verifier_bp: default_verifier_bp(),
        }
    }

    /// Share of `pool` in basis points of total supply.
    pub fn bp_for(&self, pool: AllocationPool) -> BasisPoints {
        BasisPoints::new(match pool {
            AllocationPool::Founder => self.founder_bp,
            AllocationPool::Participants => self.participants_bp,
            AllocationPool::Treasury => self.treasury_bp,
            AllocationPool::Verifier => self.verifier_bp,
        })
    }

    /// The four pools must cover the supply exactly.
    pub fn validate(&self) -> Result<(), TypesError> {
        let sum: u64 = AllocationPool::ALL
            .iter()
            .map(|p| u64::from(self.bp_for(*p).get()))
            .sum();
        if sum != u64::from(BP_SCALE) {
            return Err(TypesError::PoolSumMismatch { sum });
        }
        Ok(())
    }
}

impl Default for PoolSplit {
    fn default() -> Self {
        Self::reference()
    }
}
