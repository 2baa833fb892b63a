//! Entitlement records and the round-vesting arithmetic.
//!
//! A recipient's entitlement vests in equal slices, one per round:
//! ```text
//! per_round  = claim_limit / total_rounds        (floor)
//! vested(r)  = per_round * r
//! payable(r) = vested(r) - claimed               (never negative)
//! dust       = claim_limit - per_round * total_rounds
//! ```
//! The floor division is observable: up to `total_rounds - 1` units of dust
//! stay unclaimable forever.

use serde::{Deserialize, Serialize};

use crate::{RoundIndex, RoundState};

/// Token amounts in base units.
pub type Amount = u128;

/// Per-recipient entitlement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementRecord {
    /// Total the recipient may ever claim. Overwritten, never accumulated.
    pub claim_limit: Amount,
    /// Cumulative amount already paid out.
    pub claimed: Amount,
}

impl EntitlementRecord {
    #[must_use]
    pub fn new(claim_limit: Amount) -> Self {
        Self {
            claim_limit,
            claimed: 0,
        }
    }

    /// Whether an entitlement has been configured at all.
    #[must_use]
    pub fn is_whitelisted(&self) -> bool {
        self.claim_limit > 0
    }

    /// Amount that vests with each round.
    #[must_use]
    pub fn per_round(&self, total_rounds: RoundIndex) -> Amount {
        if total_rounds == 0 {
            return 0;
        }
        self.claim_limit / Amount::from(total_rounds)
    }

    /// Cumulative amount vested once `round` has started.
    ///
    /// `round` is clamped to `total_rounds`, so the product never exceeds
    /// `claim_limit`.
    #[must_use]
    pub fn vested_at(&self, round: RoundIndex, total_rounds: RoundIndex) -> Amount {
        self.per_round(total_rounds) * Amount::from(round.min(total_rounds))
    }

    /// Vested but not yet paid out.
    #[must_use]
    pub fn payable_at(&self, round: RoundIndex, total_rounds: RoundIndex) -> Amount {
        self.vested_at(round, total_rounds)
            .saturating_sub(self.claimed)
    }

    /// Residual left unclaimable by the floor division.
    #[must_use]
    pub fn dust(&self, total_rounds: RoundIndex) -> Amount {
        self.claim_limit - self.vested_at(total_rounds, total_rounds)
    }

    /// True only after the limit was corrected below an earlier payout.
    #[must_use]
    pub fn exceeds_limit(&self) -> bool {
        self.claimed > self.claim_limit
    }
}

/// Read-only view of what a recipient could claim right now.
///
/// Computed with exactly the settlement arithmetic; pool funding is not
/// considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimQuote {
    pub claim_limit: Amount,
    pub claimed: Amount,
    pub current_round: RoundIndex,
    pub total_rounds: RoundIndex,
    pub per_round: Amount,
    pub vested_now: Amount,
    pub payable: Amount,
    /// Still to vest in future rounds (excludes dust).
    pub unvested: Amount,
    pub dust: Amount,
}

impl ClaimQuote {
    #[must_use]
    pub fn compute(record: &EntitlementRecord, rounds: &RoundState) -> Self {
        let total = rounds.total();
        let current = rounds.current();
        let vested_now = record.vested_at(current, total);
        let fully_vested = record.vested_at(total, total);
        Self {
            claim_limit: record.claim_limit,
            claimed: record.claimed,
            current_round: current,
            total_rounds: total,
            per_round: record.per_round(total),
            vested_now,
            payable: record.payable_at(current, total),
            unvested: fully_vested - vested_now,
            dust: record.dust(total),
        }
    }

    /// Whether a claim would pay anything (ignoring pool funding).
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        self.current_round > 0 && self.claim_limit > 0 && self.payable > 0
    }
}
