//! Supply conservation audit.
//!
//! Identities that hold after every committed operation:
//! ```text
//! Σ claimed        == total_paid_out
//! total_available  == total_refilled - total_paid_out
//! Σ claimed        <= total_refilled
//! total_available  <= collaborator.balance_of(ledger_account)
//! ```
//!
//! If any of these breaks, value was created or lost somewhere and the
//! ledger must stop paying out.

use compledger_types::{AccountId, Amount, LedgerError, Result};
use serde::{Deserialize, Serialize};

use crate::entitlements::EntitlementLedger;
use crate::fund_pool::FundPool;

/// Figures gathered by a passing audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantReport {
    pub recipients: usize,
    pub total_claimed: Amount,
    pub total_refilled: Amount,
    pub total_paid_out: Amount,
    pub total_available: Amount,
    /// What the collaborator says the ledger account holds.
    pub pool_holdings: Amount,
    /// Recipients whose limit was corrected below an earlier payout.
    pub corrected_records: Vec<AccountId>,
}

fn violation(reason: String) -> LedgerError {
    tracing::error!(%reason, "Supply invariant violated");
    LedgerError::SupplyInvariantViolation { reason }
}

/// Audit ledger counters against each other and against the collaborator.
///
/// # Errors
/// Returns [`LedgerError::SupplyInvariantViolation`] naming the first
/// identity that does not hold.
pub fn verify(
    entitlements: &EntitlementLedger,
    pool: &FundPool,
    pool_holdings: Amount,
) -> Result<InvariantReport> {
    let total_claimed = entitlements
        .total_claimed()
        .ok_or_else(|| violation("sum of claimed overflows".into()))?;

    if total_claimed != pool.total_paid_out() {
        return Err(violation(format!(
            "claimed {total_claimed} != paid out {}",
            pool.total_paid_out()
        )));
    }

    let expected_available = pool
        .total_refilled()
        .checked_sub(pool.total_paid_out())
        .ok_or_else(|| {
            violation(format!(
                "paid out {} exceeds refilled {}",
                pool.total_paid_out(),
                pool.total_refilled()
            ))
        })?;
    if pool.available() != expected_available {
        return Err(violation(format!(
            "available {} != refilled {} - paid out {}",
            pool.available(),
            pool.total_refilled(),
            pool.total_paid_out()
        )));
    }

    if total_claimed > pool.total_refilled() {
        return Err(violation(format!(
            "claimed {total_claimed} exceeds refilled {}",
            pool.total_refilled()
        )));
    }

    if pool.available() > pool_holdings {
        return Err(violation(format!(
            "pool books {} but ledger account holds {pool_holdings}",
            pool.available()
        )));
    }

    Ok(InvariantReport {
        recipients: entitlements.len(),
        total_claimed,
        total_refilled: pool.total_refilled(),
        total_paid_out: pool.total_paid_out(),
        total_available: pool.available(),
        pool_holdings,
        corrected_records: entitlements.corrected_records(),
    })
}
