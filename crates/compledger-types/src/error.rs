//! Error types for the Compledger ledger.
//!
//! All errors use the `CL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Access control errors
//! - 2xx: Validation errors
//! - 3xx: Round state errors
//! - 4xx: Claim errors
//! - 5xx: Pool / transfer errors
//! - 6xx: Value-transfer collaborator errors
//! - 7xx: Invariant errors
//! - 9xx: General / internal errors

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AccountId, Amount, RoundIndex};

/// Why a claim had nothing to pay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoClaimReason {
    /// The round counter is still at zero.
    RoundNotStarted,
    /// The caller has no entitlement configured.
    NotWhitelisted,
    /// Everything vested so far has already been paid out.
    NothingVested,
}

impl fmt::Display for NoClaimReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundNotStarted => write!(f, "round not started"),
            Self::NotWhitelisted => write!(f, "caller not whitelisted"),
            Self::NothingVested => write!(f, "nothing newly vested"),
        }
    }
}

/// Central error enum for all Compledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // =================================================================
    // Access Control Errors (1xx)
    // =================================================================
    /// A non-admin identity attempted an administrative operation.
    #[error("CL_ERR_100: Unauthorized: {caller} is not the admin")]
    Unauthorized { caller: AccountId },

    // =================================================================
    // Validation Errors (2xx)
    // =================================================================
    /// Batch entitlement write with recipient/amount arrays of unequal length.
    #[error("CL_ERR_200: Length mismatch: {recipients} recipients, {amounts} amounts")]
    LengthMismatch { recipients: usize, amounts: usize },

    /// A per-round refill was requested but none is configured.
    #[error("CL_ERR_201: No per-round refill amount configured")]
    RoundRefillNotConfigured,

    /// The ledger's own holding account cannot hold an entitlement or claim.
    #[error("CL_ERR_202: Reserved recipient: {account} holds the pool")]
    ReservedRecipient { account: AccountId },

    // =================================================================
    // Round State Errors (3xx)
    // =================================================================
    /// The round counter is already at its cap.
    #[error("CL_ERR_300: Round limit reached: all {total_rounds} rounds have started")]
    RoundLimitReached { total_rounds: RoundIndex },

    // =================================================================
    // Claim Errors (4xx)
    // =================================================================
    /// Nothing is claimable for the caller right now.
    #[error("CL_ERR_400: No claim available: {reason}")]
    NoClaimAvailable { reason: NoClaimReason },

    // =================================================================
    // Pool / Transfer Errors (5xx)
    // =================================================================
    /// The pool cannot cover the full payable amount.
    #[error("CL_ERR_500: Insufficient pool balance: need {needed}, have {available}")]
    InsufficientPoolBalance { needed: Amount, available: Amount },

    /// The value-transfer collaborator rejected a pull or push.
    #[error("CL_ERR_501: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Checked arithmetic overflowed.
    #[error("CL_ERR_502: Math overflow")]
    MathOverflow,

    // =================================================================
    // Value-Transfer Collaborator Errors (6xx)
    // =================================================================
    /// Holder balance too small for the transfer.
    #[error("CL_ERR_600: Insufficient token balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Approved allowance too small for the pull.
    #[error("CL_ERR_601: Insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: Amount, approved: Amount },

    /// The account is blocked from sending or receiving.
    #[error("CL_ERR_602: Account blocked: {0}")]
    AccountBlocked(AccountId),

    // =================================================================
    // Invariant Errors (7xx)
    // =================================================================
    /// Supply conservation invariant violated. Payouts must stop.
    #[error("CL_ERR_700: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// The observation hash chain does not verify.
    #[error("CL_ERR_701: Event chain broken at sequence {sequence}")]
    EventChainBroken { sequence: u64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("CL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("CL_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl LedgerError {
    /// Shorthand for a claim rejection.
    #[must_use]
    pub fn no_claim(reason: NoClaimReason) -> Self {
        Self::NoClaimAvailable { reason }
    }

    /// Whether this error came from the value-transfer layer.
    #[must_use]
    pub fn is_transfer_failure(&self) -> bool {
        matches!(
            self,
            Self::TransferFailed { .. }
                | Self::InsufficientBalance { .. }
                | Self::InsufficientAllowance { .. }
                | Self::AccountBlocked(_)
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
