//! Recipient → entitlement mapping.
//!
//! Writes overwrite `claim_limit` and never touch `claimed`. Records are
//! created on first write and never deleted. Batch writes validate the whole
//! batch before applying any entry, so a malformed batch changes nothing.
//!
//! The ledger's own holding account is never a recipient.

use std::collections::HashMap;

use compledger_types::{AccountId, Amount, EntitlementEntry, EntitlementRecord, LedgerError, Result};

use crate::access_control::AccessControl;

/// Per-recipient claim limits and cumulative payouts.
#[derive(Debug)]
pub struct EntitlementLedger {
    records: HashMap<AccountId, EntitlementRecord>,
    /// Account holding the pool's funds; rejected as a recipient.
    ledger_account: AccountId,
}

impl EntitlementLedger {
    #[must_use]
    pub fn new(ledger_account: AccountId) -> Self {
        Self {
            records: HashMap::new(),
            ledger_account,
        }
    }

    /// Fail if `recipient` is the ledger's holding account.
    ///
    /// # Errors
    /// Returns `ReservedRecipient` for the holding account.
    pub fn ensure_recipient(&self, recipient: AccountId) -> Result<()> {
        if recipient == self.ledger_account {
            tracing::warn!(recipient = %recipient, "Holding account rejected as recipient");
            return Err(LedgerError::ReservedRecipient { account: recipient });
        }
        Ok(())
    }

    /// Set `recipient`'s claim limit to `amount`, overwriting any prior value.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `ReservedRecipient` if `recipient` is the holding account
    pub fn set(
        &mut self,
        access: &AccessControl,
        caller: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<()> {
        access.ensure_admin(caller, "set_entitlement")?;
        self.ensure_recipient(recipient)?;
        let previous = self.write(recipient, amount);
        tracing::info!(
            recipient = %recipient,
            claim_limit = amount,
            previous_limit = previous,
            "Entitlement set"
        );
        Ok(())
    }

    /// Apply `amounts[i]` to `recipients[i]` in order; later duplicates win.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `LengthMismatch` if the slices differ in length (nothing applied)
    /// - `ReservedRecipient` if any entry names the holding account (nothing applied)
    pub fn set_batch(
        &mut self,
        access: &AccessControl,
        caller: AccountId,
        recipients: &[AccountId],
        amounts: &[Amount],
    ) -> Result<usize> {
        access.ensure_admin(caller, "set_entitlement_batch")?;

        // Phase 1: validate the whole batch.
        if recipients.len() != amounts.len() {
            tracing::warn!(
                recipients = recipients.len(),
                amounts = amounts.len(),
                "Entitlement batch rejected"
            );
            return Err(LedgerError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        for &recipient in recipients {
            self.ensure_recipient(recipient)?;
        }

        // Phase 2: apply. Nothing below can fail.
        for (&recipient, &amount) in recipients.iter().zip(amounts) {
            self.write(recipient, amount);
        }
        tracing::info!(entries = recipients.len(), "Entitlement batch applied");
        Ok(recipients.len())
    }

    fn write(&mut self, recipient: AccountId, amount: Amount) -> Amount {
        let record = self.records.entry(recipient).or_default();
        std::mem::replace(&mut record.claim_limit, amount)
    }

    /// Record for `recipient`, zeroed if never written.
    #[must_use]
    pub fn record(&self, recipient: AccountId) -> EntitlementRecord {
        self.records.get(&recipient).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn entitlement_of(&self, recipient: AccountId) -> Amount {
        self.record(recipient).claim_limit
    }

    #[must_use]
    pub fn claimed_of(&self, recipient: AccountId) -> Amount {
        self.record(recipient).claimed
    }

    /// Commit a settled claim: `claimed` becomes `vested_now`.
    pub(crate) fn commit_claim(&mut self, recipient: AccountId, vested_now: Amount) {
        self.records.entry(recipient).or_default().claimed = vested_now;
    }

    /// Number of recipients ever written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, sorted by recipient.
    #[must_use]
    pub fn entries(&self) -> Vec<EntitlementEntry> {
        let mut entries: Vec<EntitlementEntry> = self
            .records
            .iter()
            .map(|(&recipient, &record)| EntitlementEntry { recipient, record })
            .collect();
        entries.sort_by_key(|e| e.recipient);
        entries
    }

    /// Sum of `claimed`, or `None` on overflow.
    #[must_use]
    pub fn total_claimed(&self) -> Option<Amount> {
        self.records
            .values()
            .try_fold(0u128, |acc, r| acc.checked_add(r.claimed))
    }

    /// Recipients whose limit was corrected below an earlier payout.
    #[must_use]
    pub fn corrected_records(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self
            .records
            .iter()
            .filter(|(_, r)| r.exceeds_limit())
            .map(|(&id, _)| id)
            .collect();
        ids.sort();
        ids
    }
}
