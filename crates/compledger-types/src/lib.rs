//! # compledger-types
//!
//! Shared types, errors, and configuration for the **Compledger**
//! compensation ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`]
//! - **Entitlement model**: [`Amount`], [`EntitlementRecord`], [`ClaimQuote`]
//! - **Round model**: [`RoundIndex`], [`RoundPhase`], [`RoundState`]
//! - **Observations**: [`LedgerEvent`], [`EventRecord`]
//! - **Snapshots**: [`LedgerSnapshot`], [`EntitlementEntry`]
//! - **Configuration**: [`LedgerConfig`], [`TokenConfig`]
//! - **Errors**: [`LedgerError`] with `CL_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod entitlement;
pub mod error;
pub mod event;
pub mod ids;
pub mod round;
pub mod snapshot;

// Re-export all primary types at crate root for ergonomic imports:
//   use compledger_types::{AccountId, EntitlementRecord, LedgerError, ...};

pub use config::*;
pub use entitlement::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use round::*;
pub use snapshot::*;

// Constants are accessed via `compledger_types::constants::FOO`
// (not re-exported to avoid name collisions).
