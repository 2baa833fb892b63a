//! Round scheduler.
//!
//! Owns the global [`RoundState`]. Only the admin can advance it, one step
//! at a time, up to `total_rounds`.

use compledger_types::{AccountId, Result, RoundIndex, RoundPhase, RoundState};

use crate::access_control::AccessControl;

/// Admin-gated wrapper around the round counter.
#[derive(Debug, Clone, Copy)]
pub struct RoundScheduler {
    state: RoundState,
}

impl RoundScheduler {
    #[must_use]
    pub fn new(total_rounds: RoundIndex) -> Self {
        Self {
            state: RoundState::new(total_rounds),
        }
    }

    /// Start the next round.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the admin
    /// - `RoundLimitReached` once the final round has started
    pub fn advance(&mut self, access: &AccessControl, caller: AccountId) -> Result<RoundIndex> {
        access.ensure_admin(caller, "advance_round")?;
        let round = self.state.advance().inspect_err(|err| {
            tracing::warn!(error = %err, "Round advance rejected");
        })?;
        tracing::info!(round, total_rounds = self.state.total(), "Round advanced");
        Ok(round)
    }

    /// Run every check `advance` would, without changing state.
    pub fn preflight(&self, access: &AccessControl, caller: AccountId) -> Result<RoundIndex> {
        access.ensure_admin(caller, "advance_round")?;
        self.state.check_advance()
    }

    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub fn current(&self) -> RoundIndex {
        self.state.current()
    }

    #[must_use]
    pub fn total(&self) -> RoundIndex {
        self.state.total()
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.state.phase()
    }
}
