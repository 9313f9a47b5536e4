//! Allocation calculator.
//!
//! Pure functions over a participant snapshot and the pool constants. Nothing
//! here touches the store.
//!
//! All arithmetic is integer. Multiplication always happens before division,
//! so each computation rounds down by at most one smallest unit.

use cohort_store::{ParticipantRecord, ProposalRecord};
use cohort_types::{
    Address, AllocationPool, BasisPoints, PoolSplit, ProposalId, TokenAmount, BP_SCALE,
};
use serde::{Deserialize, Serialize};

const SCALE: u128 = BP_SCALE as u128;

/// How the participant pool is divided among non-proposer participants.
///
/// Every policy assigns integer weights and then runs the same
/// floor-then-remainder split, so the shares always sum to exactly 10000.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Every participant gets the same share regardless of verification.
    #[default]
    Equal,
    /// Verified participants weigh `verified_weight`, the rest
    /// `unverified_weight`. Both must be at least 1.
    VerifiedWeighted {
        verified_weight: u32,
        unverified_weight: u32,
    },
}

impl SplitPolicy {
    pub fn weight(&self, participant: &ParticipantRecord) -> u64 {
        match self {
            Self::Equal => 1,
            Self::VerifiedWeighted {
                verified_weight,
                unverified_weight,
            } => {
                if participant.verified {
                    u64::from(*verified_weight)
                } else {
                    u64::from(*unverified_weight)
                }
            }
        }
    }

    fn weight_bounds(&self) -> (u64, u64) {
        match self {
            Self::Equal => (1, 1),
            Self::VerifiedWeighted {
                verified_weight,
                unverified_weight,
            } => {
                let (a, b) = (u64::from(*verified_weight), u64::from(*unverified_weight));
                (a.min(b), a.max(b))
            }
        }
    }

    /// Check that no participant can end up with a zero share when at most
    /// `max_recipients` share the pool.
    pub fn validate(&self, max_recipients: u32) -> Result<(), String> {
        let (min_w, max_w) = self.weight_bounds();
        if min_w == 0 {
            return Err("split weights must be at least 1".into());
        }
        let worst_total = u128::from(max_recipients) * u128::from(max_w);
        if worst_total > SCALE * u128::from(min_w) {
            return Err(format!(
                "{max_recipients} recipients with weights {min_w}..{max_w} can produce a zero share"
            ));
        }
        Ok(())
    }
}

/// Divide 10000 bp in proportion to `weights`.
///
/// Each entry gets `floor(10000 * w / W)`; the leftover basis points go one
/// at a time to the first entries in order. With equal weights this is
/// `floor(10000 / N)` each plus one extra for the first `10000 mod N`.
///
/// Returns `None` when there is nothing to divide among (no entries or all
/// weights zero).
pub fn split_basis_points(weights: &[u64]) -> Option<Vec<BasisPoints>> {
    let total: u128 = weights.iter().map(|w| u128::from(*w)).sum();
    if total == 0 {
        return None;
    }
    let mut shares: Vec<u128> = weights
        .iter()
        .map(|w| SCALE * u128::from(*w) / total)
        .collect();
    let assigned: u128 = shares.iter().sum();
    // floors lose less than one bp each, so the remainder is below N
    let remainder = (SCALE - assigned) as usize;
    for share in shares.iter_mut().take(remainder) {
        *share += 1;
    }
    Some(
        shares
            .into_iter()
            .map(|s| BasisPoints::new(s as u32))
            .collect(),
    )
}

/// `floor(total_supply * pool_bp / 10000)`.
pub fn pool_amount(pool_bp: BasisPoints, total_supply: TokenAmount) -> TokenAmount {
    TokenAmount::new(total_supply.raw().saturating_mul(u128::from(pool_bp.get())) / SCALE)
}

/// `floor(total_supply * pool_bp / 10000) * allocation_bp / 10000`.
///
/// Exact as long as `total_supply * 10000` fits in `u128`, which holds for
/// every configurable supply.
pub fn token_amount(
    allocation_bp: BasisPoints,
    pool_bp: BasisPoints,
    total_supply: TokenAmount,
) -> TokenAmount {
    let pool = pool_amount(pool_bp, total_supply);
    TokenAmount::new(pool.raw().saturating_mul(u128::from(allocation_bp.get())) / SCALE)
}

/// One row of the issuer's payout table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub pool: AllocationPool,
    /// `None` while the recipient is not known yet (treasury before
    /// deployment, verifier when none is configured).
    pub recipient: Option<Address>,
    /// Share of `pool`.
    pub allocation_bp: BasisPoints,
    pub amount: TokenAmount,
    /// `amount` in whole tokens, fraction dropped. Display only.
    pub whole_tokens: u128,
}

/// The full token table for one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub proposal: ProposalId,
    pub symbol: String,
    pub total_supply: TokenAmount,
    /// Decimal places of the token; amounts are in smallest units.
    pub decimals: u32,
    pub lines: Vec<AllocationLine>,
    /// Rounding remainder, already included in the treasury line.
    pub dust: TokenAmount,
}

impl AllocationPlan {
    /// Build the plan from a participant snapshot in ordinal order.
    ///
    /// `participants` carry the shares to pay out; the proposer's own entry
    /// is skipped because the founder pool covers it.
    pub fn build(
        proposal: &ProposalRecord,
        participants: &[ParticipantRecord],
        pools: &PoolSplit,
        total_supply: TokenAmount,
        decimals: u32,
        verifier: Option<&Address>,
    ) -> Self {
        let participant_pool = pools.bp_for(AllocationPool::Participants);
        let mut lines = Vec::with_capacity(participants.len() + 3);

        lines.push(AllocationLine {
            pool: AllocationPool::Founder,
            recipient: Some(proposal.proposer.clone()),
            allocation_bp: BasisPoints::FULL,
            amount: pool_amount(pools.bp_for(AllocationPool::Founder), total_supply),
            whole_tokens: 0,
        });
        for p in participants.iter().filter(|p| p.address != proposal.proposer) {
            lines.push(AllocationLine {
                pool: AllocationPool::Participants,
                recipient: Some(p.address.clone()),
                allocation_bp: p.allocation_bp,
                amount: token_amount(p.allocation_bp, participant_pool, total_supply),
                whole_tokens: 0,
            });
        }
        lines.push(AllocationLine {
            pool: AllocationPool::Treasury,
            recipient: proposal.treasury_ref.as_deref().map(Address::new),
            allocation_bp: BasisPoints::FULL,
            amount: pool_amount(pools.bp_for(AllocationPool::Treasury), total_supply),
            whole_tokens: 0,
        });
        lines.push(AllocationLine {
            pool: AllocationPool::Verifier,
            recipient: verifier.cloned(),
            allocation_bp: BasisPoints::FULL,
            amount: pool_amount(pools.bp_for(AllocationPool::Verifier), total_supply),
            whole_tokens: 0,
        });

        let distributed: TokenAmount = lines.iter().map(|l| l.amount).sum();
        let dust = total_supply.saturating_sub(distributed);
        if let Some(treasury) = lines
            .iter_mut()
            .find(|l| l.pool == AllocationPool::Treasury)
        {
            treasury.amount = treasury.amount + dust;
        }
        for line in &mut lines {
            line.whole_tokens = line.amount.whole_tokens(decimals);
        }

        Self {
            proposal: proposal.id,
            symbol: proposal.symbol.clone(),
            total_supply,
            decimals,
            lines,
            dust,
        }
    }

    /// Sum of every line.
    pub fn total(&self) -> TokenAmount {
        self.lines.iter().map(|l| l.amount).sum()
    }

    /// Sum of the lines belonging to `pool`.
    pub fn pool_total(&self, pool: AllocationPool) -> TokenAmount {
        self.lines
            .iter()
            .filter(|l| l.pool == pool)
            .map(|l| l.amount)
            .sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
