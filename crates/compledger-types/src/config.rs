//! Configuration types for the ledger and the reference token.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, LedgerError, Result, RoundIndex, constants};

fn default_event_retention() -> usize {
    constants::DEFAULT_EVENT_RETENTION
}

/// Construction parameters for one ledger instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The only identity allowed to run administrative operations.
    pub admin: AccountId,
    /// Identity under which the pool's funds sit at the value-transfer
    /// collaborator.
    pub ledger_account: AccountId,
    /// Number of vesting rounds. Fixed for the ledger's lifetime.
    pub total_rounds: RoundIndex,
    /// Amount pulled in by `advance_round_and_refill`, if used.
    #[serde(default)]
    pub round_refill_amount: Option<Amount>,
    /// Observation records kept in memory before the oldest are evicted.
    #[serde(default = "default_event_retention")]
    pub event_retention: usize,
}

impl LedgerConfig {
    #[must_use]
    pub fn new(admin: AccountId, ledger_account: AccountId, total_rounds: RoundIndex) -> Self {
        Self {
            admin,
            ledger_account,
            total_rounds,
            round_refill_amount: None,
            event_retention: constants::DEFAULT_EVENT_RETENTION,
        }
    }

    #[must_use]
    pub fn with_round_refill(mut self, amount: Amount) -> Self {
        self.round_refill_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_event_retention(mut self, retention: usize) -> Self {
        self.event_retention = retention;
        self
    }

    /// Reject configurations the ledger cannot operate under.
    ///
    /// # Errors
    /// Returns `Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.total_rounds < constants::MIN_TOTAL_ROUNDS {
            return Err(LedgerError::Configuration(format!(
                "total_rounds must be at least {}",
                constants::MIN_TOTAL_ROUNDS
            )));
        }
        if self.admin == self.ledger_account {
            return Err(LedgerError::Configuration(
                "admin and ledger_account must differ".into(),
            ));
        }
        if self.event_retention == 0 {
            return Err(LedgerError::Configuration(
                "event_retention must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Parameters for the in-memory reference token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Entire supply, minted to `holder` at construction.
    pub initial_supply: Amount,
    pub holder: AccountId,
}

impl TokenConfig {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: Amount,
        holder: AccountId,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: constants::DEFAULT_TOKEN_DECIMALS,
            initial_supply,
            holder,
        }
    }

    /// The "Test Token" / "TEST" fixture with 10 billion units.
    #[must_use]
    pub fn test_token(holder: AccountId) -> Self {
        Self::new("Test Token", "TEST", 10_000_000_000, holder)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_empty() {
            return Err(LedgerError::Configuration("token symbol is empty".into()));
        }
        if self.decimals > constants::MAX_TOKEN_DECIMALS {
            return Err(LedgerError::Configuration(format!(
                "decimals {} exceeds {}",
                self.decimals,
                constants::MAX_TOKEN_DECIMALS
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
