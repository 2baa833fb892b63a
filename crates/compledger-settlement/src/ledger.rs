//! The compensation ledger.
//!
//! [`CompensationLedger`] composes access control, entitlements, the round
//! scheduler, the fund pool, and the observation log around one
//! value-transfer collaborator. Every public mutation is a single
//! `&mut self` call: it either commits completely (and appends its
//! observation) or returns an error with no state changed.

use compledger_token::ValueTransfer;
use compledger_types::{
    AccountId, Amount, ClaimQuote, EventRecord, LedgerConfig, LedgerError, LedgerEvent,
    LedgerSnapshot, Result, RoundIndex, RoundPhase, constants,
};
use serde::{Deserialize, Serialize};

use crate::access_control::AccessControl;
use crate::entitlements::EntitlementLedger;
use crate::event_log::EventLog;
use crate::fund_pool::FundPool;
use crate::rounds::RoundScheduler;
use crate::settlement::{self, ClaimReceipt};
use crate::supply_conservation::{self, InvariantReport};

/// Result of [`CompensationLedger::advance_round_and_refill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRefill {
    pub round: RoundIndex,
    pub refilled: Amount,
    pub total_available: Amount,
}

/// Round-based vesting ledger over a value-transfer collaborator `T`.
#[derive(Debug)]
pub struct CompensationLedger<T: ValueTransfer> {
    config: LedgerConfig,
    access: AccessControl,
    entitlements: EntitlementLedger,
    rounds: RoundScheduler,
    pool: FundPool,
    events: EventLog,
    token: T,
}

impl<T: ValueTransfer> CompensationLedger<T> {
    /// Build a ledger from a validated config. Round 0, empty pool.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(config: LedgerConfig, token: T) -> Result<Self> {
        config.validate()?;
        let events = EventLog::new(config.event_retention)?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            admin = %config.admin,
            ledger_account = %config.ledger_account,
            total_rounds = config.total_rounds,
            round_refill = ?config.round_refill_amount,
            "Compensation ledger created"
        );
        Ok(Self {
            access: AccessControl::new(config.admin),
            entitlements: EntitlementLedger::new(config.ledger_account),
            rounds: RoundScheduler::new(config.total_rounds),
            pool: FundPool::new(),
            events,
            token,
            config,
        })
    }

    // ── Admin operations ────────────────────────────────────────────

    /// Overwrite `recipient`'s claim limit. `claimed` is untouched.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `ReservedRecipient` if `recipient` is the ledger account
    pub fn set_entitlement(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.entitlements
            .set(&self.access, caller, recipient, amount)?;
        self.events.append(LedgerEvent::EntitlementSet {
            recipient,
            claim_limit: amount,
        });
        Ok(())
    }

    /// Pairwise batch form of [`Self::set_entitlement`]. Returns the number
    /// of entries applied.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `LengthMismatch` if the slices differ in length (nothing applied)
    /// - `ReservedRecipient` if any entry names the ledger account (nothing applied)
    pub fn set_entitlement_batch(
        &mut self,
        caller: AccountId,
        recipients: &[AccountId],
        amounts: &[Amount],
    ) -> Result<usize> {
        let applied = self
            .entitlements
            .set_batch(&self.access, caller, recipients, amounts)?;
        for (&recipient, &claim_limit) in recipients.iter().zip(amounts) {
            self.events.append(LedgerEvent::EntitlementSet {
                recipient,
                claim_limit,
            });
        }
        Ok(applied)
    }

    /// Pull `amount` from the admin into the pool. The admin must have
    /// approved the ledger account at the collaborator beforehand.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `TransferFailed` if the pull is rejected
    /// - `MathOverflow` if pool counters would overflow
    pub fn refill(&mut self, caller: AccountId, amount: Amount) -> Result<Amount> {
        let total_available = self.pool.refill(
            &self.access,
            caller,
            &mut self.token,
            self.config.ledger_account,
            amount,
        )?;
        self.events.append(LedgerEvent::Refill {
            admin: caller,
            amount,
            total_available,
        });
        Ok(total_available)
    }

    /// Start the next round.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `RoundLimitReached` once every round has started
    pub fn advance_round(&mut self, caller: AccountId) -> Result<RoundIndex> {
        let round = self.rounds.advance(&self.access, caller)?;
        self.events.append(LedgerEvent::RoundAdvanced {
            round,
            total_rounds: self.rounds.total(),
        });
        Ok(round)
    }

    /// Advance the round and pull the configured per-round amount, as one
    /// action.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `RoundLimitReached` once every round has started
    /// - `RoundRefillNotConfigured` if no per-round amount is configured
    /// - `TransferFailed` / `MathOverflow` from the refill
    ///
    /// On any error neither the round nor the pool has moved.
    pub fn advance_round_and_refill(&mut self, caller: AccountId) -> Result<RoundRefill> {
        self.rounds.preflight(&self.access, caller)?;
        let amount = self
            .config
            .round_refill_amount
            .ok_or(LedgerError::RoundRefillNotConfigured)?;

        let total_available = self.refill(caller, amount)?;
        // Preflight passed and nothing else touched the scheduler.
        let round = self.advance_round(caller)?;

        Ok(RoundRefill {
            round,
            refilled: amount,
            total_available,
        })
    }

    // ── Recipient operations ────────────────────────────────────────

    /// Pay `caller` everything vested and not yet claimed.
    ///
    /// # Errors
    /// - `ReservedRecipient` if `caller` is the ledger account
    /// - `NoClaimAvailable` if nothing is payable
    /// - `InsufficientPoolBalance` if the pool cannot cover it in full
    /// - `TransferFailed` if the payout is rejected
    pub fn claim(&mut self, caller: AccountId) -> Result<ClaimReceipt> {
        let receipt = settlement::settle_claim(
            &mut self.entitlements,
            &mut self.pool,
            &self.rounds,
            &mut self.token,
            self.config.ledger_account,
            caller,
        )?;
        self.events.append(LedgerEvent::Claim {
            recipient: caller,
            amount: receipt.amount,
        });
        Ok(receipt)
    }

    // ── Reads ───────────────────────────────────────────────────────

    #[must_use]
    pub fn entitlement_of(&self, recipient: AccountId) -> Amount {
        self.entitlements.entitlement_of(recipient)
    }

    #[must_use]
    pub fn claimed_of(&self, recipient: AccountId) -> Amount {
        self.entitlements.claimed_of(recipient)
    }

    #[must_use]
    pub fn available_balance(&self) -> Amount {
        self.pool.available()
    }

    #[must_use]
    pub fn total_refilled(&self) -> Amount {
        self.pool.total_refilled()
    }

    #[must_use]
    pub fn total_paid_out(&self) -> Amount {
        self.pool.total_paid_out()
    }

    #[must_use]
    pub fn current_round(&self) -> RoundIndex {
        self.rounds.current()
    }

    #[must_use]
    pub fn total_rounds(&self) -> RoundIndex {
        self.rounds.total()
    }

    #[must_use]
    pub fn round_phase(&self) -> RoundPhase {
        self.rounds.phase()
    }

    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.access.admin()
    }

    #[must_use]
    pub fn ledger_account(&self) -> AccountId {
        self.config.ledger_account
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// What `recipient` could claim now, pool funding aside.
    #[must_use]
    pub fn quote_claim(&self, recipient: AccountId) -> ClaimQuote {
        ClaimQuote::compute(&self.entitlements.record(recipient), self.rounds.state())
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            admin: self.access.admin(),
            ledger_account: self.config.ledger_account,
            entitlements: self.entitlements.entries(),
            total_available: self.pool.available(),
            total_refilled: self.pool.total_refilled(),
            total_paid_out: self.pool.total_paid_out(),
            rounds: *self.rounds.state(),
        }
    }

    /// Audit pool and entitlement counters against each other and against
    /// what the collaborator says the ledger account holds.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` naming the broken identity.
    pub fn verify_invariants(&self) -> Result<InvariantReport> {
        let holdings = self.token.balance_of(self.config.ledger_account);
        supply_conservation::verify(&self.entitlements, &self.pool, holdings)
    }

    // ── Observation log ─────────────────────────────────────────────

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Hand retained observations to an indexer.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.events.drain()
    }

    /// # Errors
    /// Returns `EventChainBroken` at the first bad record.
    pub fn verify_event_chain(&self) -> Result<()> {
        self.events.verify_chain()
    }

    // ── Collaborator access ─────────────────────────────────────────

    #[must_use]
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Direct collaborator access, for approvals and balance moves that
    /// happen outside the ledger.
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }
}
