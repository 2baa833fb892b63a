//! Single-admin capability gate.
//!
//! Every administrative operation calls [`AccessControl::ensure_admin`]
//! before touching state. Reads are never gated.

use compledger_types::{AccountId, LedgerError, Result};

/// Gate that admits exactly one identity, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct AccessControl {
    admin: AccountId,
}

impl AccessControl {
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        Self { admin }
    }

    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.admin
    }

    #[must_use]
    pub fn is_admin(&self, caller: AccountId) -> bool {
        caller == self.admin
    }

    /// Guard an administrative call. Returns `Ok(())` for the admin,
    /// or [`LedgerError::Unauthorized`] for anyone else.
    pub fn ensure_admin(&self, caller: AccountId, operation: &'static str) -> Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, operation, "Unauthorized admin call rejected");
            Err(LedgerError::Unauthorized { caller })
        }
    }
}
