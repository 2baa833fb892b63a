//! Thread-safe handle over one ledger.
//!
//! All operations serialize on a single mutex, so concurrent claims and
//! admin calls observe and commit state one at a time.

use std::sync::{Arc, Mutex};

use compledger_token::ValueTransfer;
use compledger_types::{
    AccountId, Amount, ClaimQuote, EventRecord, LedgerConfig, LedgerError, LedgerSnapshot, Result,
    RoundIndex,
};

use crate::ledger::{CompensationLedger, RoundRefill};
use crate::settlement::ClaimReceipt;
use crate::supply_conservation::InvariantReport;

/// Cloneable handle; every clone points at the same ledger.
#[derive(Debug)]
pub struct SharedLedger<T: ValueTransfer> {
    inner: Arc<Mutex<CompensationLedger<T>>>,
}

impl<T: ValueTransfer> Clone for SharedLedger<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ValueTransfer> SharedLedger<T> {
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(config: LedgerConfig, token: T) -> Result<Self> {
        Ok(Self::from_ledger(CompensationLedger::new(config, token)?))
    }

    #[must_use]
    pub fn from_ledger(ledger: CompensationLedger<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run `f` with exclusive access to the ledger.
    ///
    /// # Errors
    /// Returns `Internal` if a previous holder panicked while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut CompensationLedger<T>) -> R) -> Result<R> {
        let mut guard = self.inner.lock().map_err(|_| {
            tracing::error!("Ledger lock poisoned");
            LedgerError::Internal("ledger lock poisoned".into())
        })?;
        Ok(f(&mut guard))
    }

    /// Run `f` with exclusive access to the collaborator.
    pub fn with_token<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        self.with(|l| f(l.token_mut()))
    }

    pub fn set_entitlement(
        &self,
        caller: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.with(|l| l.set_entitlement(caller, recipient, amount))?
    }

    pub fn set_entitlement_batch(
        &self,
        caller: AccountId,
        recipients: &[AccountId],
        amounts: &[Amount],
    ) -> Result<usize> {
        self.with(|l| l.set_entitlement_batch(caller, recipients, amounts))?
    }

    pub fn refill(&self, caller: AccountId, amount: Amount) -> Result<Amount> {
        self.with(|l| l.refill(caller, amount))?
    }

    pub fn advance_round(&self, caller: AccountId) -> Result<RoundIndex> {
        self.with(|l| l.advance_round(caller))?
    }

    pub fn advance_round_and_refill(&self, caller: AccountId) -> Result<RoundRefill> {
        self.with(|l| l.advance_round_and_refill(caller))?
    }

    pub fn claim(&self, caller: AccountId) -> Result<ClaimReceipt> {
        self.with(|l| l.claim(caller))?
    }

    pub fn entitlement_of(&self, recipient: AccountId) -> Result<Amount> {
        self.with(|l| l.entitlement_of(recipient))
    }

    pub fn claimed_of(&self, recipient: AccountId) -> Result<Amount> {
        self.with(|l| l.claimed_of(recipient))
    }

    pub fn available_balance(&self) -> Result<Amount> {
        self.with(|l| l.available_balance())
    }

    pub fn current_round(&self) -> Result<RoundIndex> {
        self.with(|l| l.current_round())
    }

    pub fn total_rounds(&self) -> Result<RoundIndex> {
        self.with(|l| l.total_rounds())
    }

    pub fn quote_claim(&self, recipient: AccountId) -> Result<ClaimQuote> {
        self.with(|l| l.quote_claim(recipient))
    }

    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        self.with(|l| l.snapshot())
    }

    pub fn verify_invariants(&self) -> Result<InvariantReport> {
        self.with(|l| l.verify_invariants())?
    }

    pub fn drain_events(&self) -> Result<Vec<EventRecord>> {
        self.with(CompensationLedger::drain_events)
    }

    pub fn verify_event_chain(&self) -> Result<()> {
        self.with(|l| l.verify_event_chain())?
    }
}
