//! The interface the ledger requires from whatever actually moves value.

use compledger_types::{AccountId, Amount, Result};

/// Minimal fungible-value transfer interface.
///
/// Implementations must be all-or-nothing: a failed call leaves every
/// balance and allowance exactly as it was.
pub trait ValueTransfer {
    /// Current balance of `account` (0 if unknown).
    fn balance_of(&self, account: AccountId) -> Amount;

    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()>;

    /// Move `amount` from `owner` to `to`, spending `spender`'s allowance
    /// granted by `owner`.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()>;
}

impl<T: ValueTransfer + ?Sized> ValueTransfer for Box<T> {
    fn balance_of(&self, account: AccountId) -> Amount {
        (**self).balance_of(account)
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        (**self).transfer(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        (**self).transfer_from(spender, owner, to, amount)
    }
}
