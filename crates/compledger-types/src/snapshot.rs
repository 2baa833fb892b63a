//! Point-in-time view of the full persisted ledger layout.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, EntitlementRecord, LedgerError, RoundState};

/// One recipient's record inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementEntry {
    pub recipient: AccountId,
    pub record: EntitlementRecord,
}

/// Consistent copy of ledger state, taken under the ledger lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub admin: AccountId,
    pub ledger_account: AccountId,
    /// Sorted by recipient.
    pub entitlements: Vec<EntitlementEntry>,
    pub total_available: Amount,
    pub total_refilled: Amount,
    pub total_paid_out: Amount,
    pub rounds: RoundState,
}

impl LedgerSnapshot {
    #[must_use]
    pub fn entitlement_of(&self, recipient: AccountId) -> EntitlementRecord {
        self.entitlements
            .binary_search_by_key(&recipient, |e| e.recipient)
            .map(|idx| self.entitlements[idx].record)
            .unwrap_or_default()
    }

    /// Sum of `claimed` over all recipients, or `None` on overflow.
    #[must_use]
    pub fn total_claimed(&self) -> Option<Amount> {
        self.entitlements
            .iter()
            .try_fold(0u128, |acc, e| acc.checked_add(e.record.claimed))
    }

    /// Sum of `claim_limit` over all recipients, or `None` on overflow.
    #[must_use]
    pub fn total_committed(&self) -> Option<Amount> {
        self.entitlements
            .iter()
            .try_fold(0u128, |acc, e| acc.checked_add(e.record.claim_limit))
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot. Entitlements are re-sorted by recipient; a recipient
    /// listed twice is rejected.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let mut snap: Self = serde_json::from_str(json)?;
        snap.entitlements.sort_by_key(|e| e.recipient);
        if let Some(dup) = snap
            .entitlements
            .windows(2)
            .find(|w| w[0].recipient == w[1].recipient)
        {
            return Err(LedgerError::Serialization(format!(
                "duplicate entitlement for {}",
                dup[0].recipient
            )));
        }
        Ok(snap)
    }
}
