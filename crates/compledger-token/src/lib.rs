//! # compledger-token
//!
//! The value-transfer boundary of the compensation ledger.
//!
//! The ledger never tracks token supply itself. It consumes the narrow
//! [`ValueTransfer`] interface:
//!
//! 1. **balance_of**: read any holder's balance
//! 2. **transfer**: push value from one holder to another
//! 3. **transfer_from**: allowance-gated pull used by pool refills
//!
//! [`TokenLedger`] is an in-memory fungible token implementing that
//! interface (fixed supply, ERC-20 style allowances, blockable accounts).
//!
//! ## Refill / Claim Flow
//!
//! ```text
//! admin.approve(ledger_account, n) → ledger.refill(n) → transfer_from(admin → ledger_account)
//! ledger.claim(u)                  → transfer(ledger_account → u)
//! ```

pub mod token_ledger;
pub mod transfer;

pub use token_ledger::TokenLedger;
pub use transfer::ValueTransfer;
