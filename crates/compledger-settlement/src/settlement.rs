//! Claim settlement.
//!
//! A claim is planned from a read of entitlement + round state, then
//! settled as one atomic transition:
//! 1. Reject the holding account, then reject if the round has not started
//!    or the caller has no entitlement
//! 2. `per_round = limit / total_rounds` (floor), `vested = per_round * round`
//! 3. `payable = vested - claimed`; reject if zero
//! 4. Reject unless the pool covers `payable` in full (no partial payouts)
//! 5. Push `payable` to the caller via the collaborator
//! 6. Only after the push succeeds: `claimed = vested`, pool debited
//!
//! If step 5 fails nothing has been written, so no rollback is needed.

use compledger_token::ValueTransfer;
use compledger_types::{AccountId, Amount, LedgerError, NoClaimReason, Result, RoundIndex};
use serde::{Deserialize, Serialize};

use crate::entitlements::EntitlementLedger;
use crate::fund_pool::FundPool;
use crate::rounds::RoundScheduler;

/// What a claim would do if settled now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimPlan {
    pub recipient: AccountId,
    pub round: RoundIndex,
    /// New cumulative `claimed` after settlement.
    pub vested_now: Amount,
    pub payable: Amount,
}

/// Outcome of a settled claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub recipient: AccountId,
    pub round: RoundIndex,
    /// Paid out by this claim.
    pub amount: Amount,
    /// Cumulative paid out to the recipient, including this claim.
    pub claimed_total: Amount,
    /// Pool balance after the payout.
    pub pool_remaining: Amount,
}

/// Compute what `recipient` may withdraw now. Pure read.
///
/// # Errors
/// - `ReservedRecipient` if `recipient` is the holding account
/// - `NoClaimAvailable` with the reason nothing is payable
pub fn plan_claim(
    entitlements: &EntitlementLedger,
    rounds: &RoundScheduler,
    recipient: AccountId,
) -> Result<ClaimPlan> {
    entitlements.ensure_recipient(recipient)?;
    let record = entitlements.record(recipient);
    let round = rounds.current();

    if !rounds.state().is_started() {
        return Err(LedgerError::no_claim(NoClaimReason::RoundNotStarted));
    }
    if !record.is_whitelisted() {
        return Err(LedgerError::no_claim(NoClaimReason::NotWhitelisted));
    }

    let vested_now = record.vested_at(round, rounds.total());
    let payable = record.payable_at(round, rounds.total());
    if payable == 0 {
        return Err(LedgerError::no_claim(NoClaimReason::NothingVested));
    }

    Ok(ClaimPlan {
        recipient,
        round,
        vested_now,
        payable,
    })
}

/// Plan and settle a claim for `recipient`.
///
/// # Errors
/// - `ReservedRecipient` if `recipient` is the holding account
/// - `NoClaimAvailable` if nothing is payable
/// - `InsufficientPoolBalance` if the pool cannot cover the full amount
/// - `TransferFailed` if the collaborator rejects the payout
///
/// Every error leaves entitlements, pool, and collaborator balances unchanged.
pub fn settle_claim<T: ValueTransfer>(
    entitlements: &mut EntitlementLedger,
    pool: &mut FundPool,
    rounds: &RoundScheduler,
    token: &mut T,
    ledger_account: AccountId,
    recipient: AccountId,
) -> Result<ClaimReceipt> {
    let plan = plan_claim(entitlements, rounds, recipient).inspect_err(|err| {
        tracing::debug!(recipient = %recipient, error = %err, "Claim rejected");
    })?;

    pool.ensure_covers(plan.payable).inspect_err(|err| {
        tracing::warn!(recipient = %recipient, error = %err, "Claim underfunded");
    })?;

    token
        .transfer(ledger_account, recipient, plan.payable)
        .map_err(|err| {
            tracing::warn!(
                recipient = %recipient,
                amount = plan.payable,
                error = %err,
                "Claim payout failed"
            );
            LedgerError::TransferFailed {
                reason: err.to_string(),
            }
        })?;

    // The payout is out; book it. `debit` cannot fail after `ensure_covers`.
    let pool_remaining = pool.debit(plan.payable)?;
    entitlements.commit_claim(recipient, plan.vested_now);

    tracing::info!(
        recipient = %recipient,
        round = plan.round,
        amount = plan.payable,
        claimed_total = plan.vested_now,
        pool_remaining,
        "Claim settled"
    );

    Ok(ClaimReceipt {
        recipient,
        round: plan.round,
        amount: plan.payable,
        claimed_total: plan.vested_now,
        pool_remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::AccessControl;
    use compledger_token::TokenLedger;
    use compledger_types::TokenConfig;

    struct Fixture {
        entitlements: EntitlementLedger,
        pool: FundPool,
        rounds: RoundScheduler,
        access: AccessControl,
        token: TokenLedger,
        admin: AccountId,
        ledger_account: AccountId,
    }

    impl Fixture {
        fn new(total_rounds: RoundIndex) -> Self {
            let admin = AccountId::from_u64(100);
            let ledger_account = AccountId::from_u64(200);
            Self {
                entitlements: EntitlementLedger::new(ledger_account),
                pool: FundPool::new(),
                rounds: RoundScheduler::new(total_rounds),
                access: AccessControl::new(admin),
                token: TokenLedger::new(&TokenConfig::test_token(admin)).unwrap(),
                admin,
                ledger_account,
            }
        }

        fn fund(&mut self, amount: Amount) {
            self.token.approve(self.admin, self.ledger_account, amount);
            self.pool
                .refill(
                    &self.access,
                    self.admin,
                    &mut self.token,
                    self.ledger_account,
                    amount,
                )
                .unwrap();
        }

        fn entitle(&mut self, recipient: AccountId, amount: Amount) {
            self.entitlements
                .set(&self.access, self.admin, recipient, amount)
                .unwrap();
        }

        fn advance(&mut self) {
            self.rounds.advance(&self.access, self.admin).unwrap();
        }

        fn claim(&mut self, recipient: AccountId) -> Result<ClaimReceipt> {
            settle_claim(
                &mut self.entitlements,
                &mut self.pool,
                &self.rounds,
                &mut self.token,
                self.ledger_account,
                recipient,
            )
        }
    }

    fn no_claim(err: &LedgerError) -> Option<NoClaimReason> {
        match err {
            LedgerError::NoClaimAvailable { reason } => Some(*reason),
            _ => None,
        }
    }

    #[test]
    fn claim_before_start_rejected() {
        let mut f = Fixture::new(10);
        let u = AccountId::from_u64(1);
        f.fund(1000);
        f.entitle(u, 1000);
        let err = f.claim(u).unwrap_err();
        assert_eq!(no_claim(&err), Some(NoClaimReason::RoundNotStarted));
    }

    #[test]
    fn non_whitelisted_rejected() {
        let mut f = Fixture::new(10);
        f.fund(1000);
        f.advance();
        let err = f.claim(AccountId::from_u64(1)).unwrap_err();
        assert_eq!(no_claim(&err), Some(NoClaimReason::NotWhitelisted));
        assert_eq!(f.pool.available(), 1000);
    }

    #[test]
    fn round_one_pays_one_slice() {
        let mut f = Fixture::new(10);
        let u = AccountId::from_u64(1);
        f.fund(1000);
        f.entitle(u, 1000);
        f.advance();

        let receipt = f.claim(u).unwrap();
        assert_eq!(receipt.amount, 100);
        assert_eq!(receipt.claimed_total, 100);
        assert_eq!(receipt.pool_remaining, 900);
        assert_eq!(receipt.round, 1);
        assert_eq!(f.entitlements.claimed_of(u), 100);
        assert_eq!(f.token.balance_of(u), 100);
        assert_eq!(f.token.balance_of(f.ledger_account), 900);
    }

    #[test]
    fn second_claim_same_round_rejected() {
        let mut f = Fixture::new(10);
        let u = AccountId::from_u64(1);
        f.fund(1000);
        f.entitle(u, 1000);
        f.advance();
        f.claim(u).unwrap();

        let err = f.claim(u).unwrap_err();
        assert_eq!(no_claim(&err), Some(NoClaimReason::NothingVested));
        assert_eq!(f.entitlements.claimed_of(u), 100);
        assert_eq!(f.pool.available(), 900);
    }

    #[test]
    fn skipped_rounds_catch_up() {
        let mut f = Fixture::new(10);
        let u = AccountId::from_u64(1);
        f.fund(1000);
        f.entitle(u, 1000);
        for _ in 0..4 {
            f.advance();
        }
        assert_eq!(f.claim(u).unwrap().amount, 400);
    }

    #[test]
    fn underfunded_pool_pays_nothing() {
        let mut f = Fixture::new(1);
        let u = AccountId::from_u64(1);
        f.fund(499);
        f.entitle(u, 500);
        f.advance();

        let err = f.claim(u).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientPoolBalance {
                needed: 500,
                available: 499
            }
        ));
        assert_eq!(f.entitlements.claimed_of(u), 0);
        assert_eq!(f.pool.available(), 499);
        assert_eq!(f.token.balance_of(u), 0);
    }

    #[test]
    fn failed_payout_commits_nothing() {
        let mut f = Fixture::new(2);
        let u = AccountId::from_u64(1);
        f.fund(1000);
        f.entitle(u, 1000);
        f.advance();
        f.token.block(u);

        let err = f.claim(u).unwrap_err();
        assert!(matches!(err, LedgerError::TransferFailed { .. }));
        assert_eq!(f.entitlements.claimed_of(u), 0);
        assert_eq!(f.pool.available(), 1000);
        assert_eq!(f.pool.total_paid_out(), 0);
        assert_eq!(f.token.balance_of(f.ledger_account), 1000);

        f.token.unblock(u);
        assert_eq!(f.claim(u).unwrap().amount, 500);
    }

    #[test]
    fn plan_is_read_only() {
        let mut f = Fixture::new(4);
        let u = AccountId::from_u64(1);
        f.entitle(u, 100);
        f.advance();
        let plan = plan_claim(&f.entitlements, &f.rounds, u).unwrap();
        assert_eq!(plan.payable, 25);
        assert_eq!(plan.vested_now, 25);
        assert_eq!(f.entitlements.claimed_of(u), 0);
    }

    #[test]
    fn holding_account_claim_rejected() {
        let mut f = Fixture::new(1);
        f.fund(1000);
        f.advance();
        let holding = f.ledger_account;

        let err = f.claim(holding).unwrap_err();
        assert!(matches!(err, LedgerError::ReservedRecipient { .. }));
        assert_eq!(f.pool.available(), 1000);
        assert_eq!(f.pool.total_paid_out(), 0);
        assert_eq!(f.entitlements.claimed_of(holding), 0);
        assert_eq!(f.token.balance_of(holding), 1000);
    }
}
