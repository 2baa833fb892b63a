//! Pooled balance backing all claims.
//!
//! The pool grows only through admin refills (an allowance-gated pull from
//! the admin's external balance) and shrinks only through settled claims.
//! Besides `total_available` it keeps cumulative refill and payout totals
//! for the supply conservation audit:
//! ```text
//! total_available == total_refilled - total_paid_out
//! ```

use compledger_token::ValueTransfer;
use compledger_types::{AccountId, Amount, LedgerError, Result};

use crate::access_control::AccessControl;

/// Pool counters. All arithmetic is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundPool {
    total_available: Amount,
    total_refilled: Amount,
    total_paid_out: Amount,
}

impl FundPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull `amount` from the admin into `ledger_account` and credit the pool.
    ///
    /// Returns the new `total_available`.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `MathOverflow` if the counters would overflow (nothing pulled)
    /// - `TransferFailed` if the collaborator rejects the pull (pool unchanged)
    pub fn refill<T: ValueTransfer>(
        &mut self,
        access: &AccessControl,
        caller: AccountId,
        token: &mut T,
        ledger_account: AccountId,
        amount: Amount,
    ) -> Result<Amount> {
        access.ensure_admin(caller, "refill")?;

        let new_available = self
            .total_available
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;
        let new_refilled = self
            .total_refilled
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;

        token
            .transfer_from(ledger_account, caller, ledger_account, amount)
            .map_err(|err| {
                tracing::warn!(admin = %caller, amount, error = %err, "Refill pull failed");
                LedgerError::TransferFailed {
                    reason: err.to_string(),
                }
            })?;

        self.total_available = new_available;
        self.total_refilled = new_refilled;
        tracing::info!(
            admin = %caller,
            amount,
            total_available = new_available,
            "Pool refilled"
        );
        Ok(new_available)
    }

    /// Fail unless the pool can cover `amount` in full.
    ///
    /// # Errors
    /// Returns `InsufficientPoolBalance` otherwise.
    pub fn ensure_covers(&self, amount: Amount) -> Result<()> {
        if self.total_available < amount {
            return Err(LedgerError::InsufficientPoolBalance {
                needed: amount,
                available: self.total_available,
            });
        }
        Ok(())
    }

    /// Debit a settled payout. Callers run [`Self::ensure_covers`] first.
    pub(crate) fn debit(&mut self, amount: Amount) -> Result<Amount> {
        self.ensure_covers(amount)?;
        let paid_out = self
            .total_paid_out
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;
        self.total_available -= amount;
        self.total_paid_out = paid_out;
        Ok(self.total_available)
    }

    #[must_use]
    pub fn available(&self) -> Amount {
        self.total_available
    }

    #[must_use]
    pub fn total_refilled(&self) -> Amount {
        self.total_refilled
    }

    #[must_use]
    pub fn total_paid_out(&self) -> Amount {
        self.total_paid_out
    }
}
