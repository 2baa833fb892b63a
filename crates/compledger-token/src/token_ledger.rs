//! In-memory reference token.
//!
//! Tracks per-holder balances and per-(owner, spender) allowances. The full
//! supply is minted to one holder at construction and never changes. All
//! mutations are atomic: either the full operation succeeds or balances and
//! allowances are unchanged.

use std::collections::{HashMap, HashSet};

use compledger_types::{AccountId, Amount, LedgerError, Result, TokenConfig};

use crate::transfer::ValueTransfer;

/// Fixed-supply fungible token with ERC-20 style allowances.
#[derive(Debug)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    /// Per-holder balances.
    balances: HashMap<AccountId, Amount>,
    /// Approved amounts keyed by (owner, spender).
    allowances: HashMap<(AccountId, AccountId), Amount>,
    /// Accounts that may neither send nor receive.
    blocked: HashSet<AccountId>,
}

impl TokenLedger {
    /// Mint the configured supply to `config.holder`.
    ///
    /// # Errors
    /// Returns `Configuration` if the config does not validate.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        config.validate()?;
        let mut balances = HashMap::new();
        balances.insert(config.holder, config.initial_supply);
        tracing::info!(
            symbol = %config.symbol,
            supply = config.initial_supply,
            holder = %config.holder,
            "Token minted"
        );
        Ok(Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            total_supply: config.initial_supply,
            balances,
            allowances: HashMap::new(),
            blocked: HashSet::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Allow `spender` to pull up to `amount` from `owner`. Overwrites any
    /// previous approval.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
        tracing::debug!(owner = %owner, spender = %spender, amount, "Allowance approved");
    }

    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Block an account from sending or receiving.
    pub fn block(&mut self, account: AccountId) {
        self.blocked.insert(account);
        tracing::warn!(account = %account, "Account blocked");
    }

    pub fn unblock(&mut self, account: AccountId) {
        self.blocked.remove(&account);
    }

    #[must_use]
    pub fn is_blocked(&self, account: AccountId) -> bool {
        self.blocked.contains(&account)
    }

    /// Sum of all holder balances. Always equals `total_supply`.
    #[must_use]
    pub fn circulating(&self) -> Amount {
        self.balances.values().sum()
    }

    fn check_not_blocked(&self, from: AccountId, to: AccountId) -> Result<()> {
        if self.is_blocked(from) {
            return Err(LedgerError::AccountBlocked(from));
        }
        if self.is_blocked(to) {
            return Err(LedgerError::AccountBlocked(to));
        }
        Ok(())
    }

    fn check_balance(&self, from: AccountId, amount: Amount) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Debit then credit. Callers must have run the checks first.
    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: Amount) {
        if let Some(bal) = self.balances.get_mut(&from) {
            *bal -= amount;
        }
        *self.balances.entry(to).or_default() += amount;
    }
}

impl ValueTransfer for TokenLedger {
    fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        self.check_not_blocked(from, to)?;
        self.check_balance(from, amount)?;
        self.move_balance(from, to, amount);
        tracing::debug!(from = %from, to = %to, amount, "Token transfer");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.check_not_blocked(owner, to)?;
        let approved = self.allowance(owner, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        self.check_balance(owner, amount)?;

        self.allowances.insert((owner, spender), approved - amount);
        self.move_balance(owner, to, amount);
        tracing::debug!(
            spender = %spender,
            owner = %owner,
            to = %to,
            amount,
            "Token pulled via allowance"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TokenLedger, AccountId) {
        let holder = AccountId::from_u64(1);
        let token = TokenLedger::new(&TokenConfig::test_token(holder)).unwrap();
        (token, holder)
    }

    #[test]
    fn supply_minted_to_holder() {
        let (token, holder) = setup();
        assert_eq!(token.name(), "Test Token");
        assert_eq!(token.symbol(), "TEST");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), 10_000_000_000);
        assert_eq!(token.balance_of(holder), 10_000_000_000);
        assert_eq!(token.circulating(), token.total_supply());
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = TokenConfig::test_token(AccountId::from_u64(1));
        cfg.symbol.clear();
        assert!(matches!(
            TokenLedger::new(&cfg),
            Err(LedgerError::Configuration(_))
        ));
    }

    #[test]
    fn transfer_moves_balance() {
        let (mut token, holder) = setup();
        let bob = AccountId::from_u64(2);
        token.transfer(holder, bob, 500).unwrap();
        assert_eq!(token.balance_of(bob), 500);
        assert_eq!(token.balance_of(holder), 10_000_000_000 - 500);
        assert_eq!(token.circulating(), token.total_supply());
    }

    #[test]
    fn transfer_insufficient_fails() {
        let (mut token, _) = setup();
        let bob = AccountId::from_u64(2);
        let carol = AccountId::from_u64(3);
        let err = token.transfer(bob, carol, 1).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                needed: 1,
                available: 0
            }
        ));
        assert_eq!(token.balance_of(carol), 0);
    }

    #[test]
    fn nonexistent_balance_is_zero() {
        let (token, _) = setup();
        assert_eq!(token.balance_of(AccountId::new()), 0);
        assert_eq!(token.allowance(AccountId::new(), AccountId::new()), 0);
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let (mut token, holder) = setup();
        let pool = AccountId::from_u64(9);
        token.approve(holder, pool, 3000);
        token.transfer_from(pool, holder, pool, 1000).unwrap();
        assert_eq!(token.balance_of(pool), 1000);
        assert_eq!(token.allowance(holder, pool), 2000);
    }

    #[test]
    fn transfer_from_without_allowance_fails() {
        let (mut token, holder) = setup();
        let pool = AccountId::from_u64(9);
        token.approve(holder, pool, 10);
        let err = token.transfer_from(pool, holder, pool, 11).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientAllowance {
                needed: 11,
                approved: 10
            }
        ));
        assert_eq!(token.allowance(holder, pool), 10);
        assert_eq!(token.balance_of(pool), 0);
    }

    #[test]
    fn transfer_from_insufficient_balance_keeps_allowance() {
        let (mut token, _) = setup();
        let poor = AccountId::from_u64(5);
        let pool = AccountId::from_u64(9);
        token.approve(poor, pool, 100);
        let err = token.transfer_from(pool, poor, pool, 100).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(token.allowance(poor, pool), 100);
    }

    #[test]
    fn approve_overwrites() {
        let (mut token, holder) = setup();
        let pool = AccountId::from_u64(9);
        token.approve(holder, pool, 100);
        token.approve(holder, pool, 7);
        assert_eq!(token.allowance(holder, pool), 7);
    }

    #[test]
    fn blocked_accounts_cannot_send_or_receive() {
        let (mut token, holder) = setup();
        let bob = AccountId::from_u64(2);
        token.block(bob);
        assert!(token.is_blocked(bob));
        assert!(matches!(
            token.transfer(holder, bob, 1).unwrap_err(),
            LedgerError::AccountBlocked(id) if id == bob
        ));

        token.unblock(bob);
        token.transfer(holder, bob, 1).unwrap();
        token.block(bob);
        assert!(token.transfer(bob, holder, 1).is_err());
        assert_eq!(token.balance_of(bob), 1);
    }

    #[test]
    fn usable_as_trait_object() {
        let (token, holder) = setup();
        let mut boxed: Box<dyn ValueTransfer> = Box::new(token);
        let bob = AccountId::from_u64(2);
        boxed.transfer(holder, bob, 42).unwrap();
        assert_eq!(boxed.balance_of(bob), 42);
    }
}
