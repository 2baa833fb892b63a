//! # compledger-settlement
//!
//! Round-based compensation ledger: an admin whitelists recipients with a
//! claim limit, funds a shared pool, and advances a global round counter.
//! Each recipient may withdraw the portion of their limit vested by the
//! current round.
//!
//! ## Components
//!
//! - [`AccessControl`]: single-admin gate for every mutation except claims
//! - [`EntitlementLedger`]: recipient → `{claim_limit, claimed}`
//! - [`RoundScheduler`]: monotonic round counter capped at `total_rounds`
//! - [`FundPool`]: pooled balance with refill/payout totals
//! - [`settlement`]: the atomic claim algorithm
//! - [`EventLog`]: hash-chained observation log
//! - [`supply_conservation`]: counter audit against the collaborator
//!
//! [`CompensationLedger`] composes them; [`SharedLedger`] serializes access
//! across threads.
//!
//! ## Vesting Arithmetic
//!
//! ```text
//! per_round = claim_limit / total_rounds        (floor)
//! vested    = per_round * min(round, total_rounds)
//! payable   = vested - claimed
//! dust      = claim_limit - per_round * total_rounds   (never claimable)
//! ```

pub mod access_control;
pub mod entitlements;
pub mod event_log;
pub mod fund_pool;
pub mod ledger;
pub mod rounds;
pub mod settlement;
pub mod shared;
pub mod supply_conservation;

pub use access_control::AccessControl;
pub use entitlements::EntitlementLedger;
pub use event_log::EventLog;
pub use fund_pool::FundPool;
pub use ledger::{CompensationLedger, RoundRefill};
pub use rounds::RoundScheduler;
pub use settlement::{ClaimPlan, ClaimReceipt};
pub use shared::SharedLedger;
pub use supply_conservation::InvariantReport;
