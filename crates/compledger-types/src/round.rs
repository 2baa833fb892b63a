//! Round lifecycle types for the vesting schedule.
//!
//! The round counter only moves forward:
//! **NOT_STARTED → ROUND(1) → ROUND(2) → … → ROUND(total)**
//!
//! `ROUND(total)` is terminal. Each advance makes one more slice of every
//! recipient's entitlement claimable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result, constants};

/// Round counter type.
pub type RoundIndex = u32;

/// Where the schedule currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// `current_round == 0`: nothing is claimable yet.
    NotStarted,
    /// Round `n` has started (1-based).
    Round(RoundIndex),
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "NOT_STARTED"),
            Self::Round(n) => write!(f, "ROUND({n})"),
        }
    }
}

/// Global round counter and its cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    current_round: RoundIndex,
    total_rounds: RoundIndex,
}

impl RoundState {
    /// Fresh schedule with `total_rounds` rounds, not yet started.
    #[must_use]
    pub fn new(total_rounds: RoundIndex) -> Self {
        Self {
            current_round: constants::ROUND_NOT_STARTED,
            total_rounds,
        }
    }

    #[must_use]
    pub fn current(&self) -> RoundIndex {
        self.current_round
    }

    #[must_use]
    pub fn total(&self) -> RoundIndex {
        self.total_rounds
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        if self.current_round == constants::ROUND_NOT_STARTED {
            RoundPhase::NotStarted
        } else {
            RoundPhase::Round(self.current_round)
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.current_round > constants::ROUND_NOT_STARTED
    }

    /// No further advance is possible.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    #[must_use]
    pub fn remaining(&self) -> RoundIndex {
        self.total_rounds.saturating_sub(self.current_round)
    }

    /// Check that an advance would succeed, without performing it.
    pub fn check_advance(&self) -> Result<RoundIndex> {
        if self.is_final() {
            return Err(LedgerError::RoundLimitReached {
                total_rounds: self.total_rounds,
            });
        }
        Ok(self.current_round + 1)
    }

    /// Move to the next round.
    ///
    /// # Errors
    /// Returns `RoundLimitReached` (state unchanged) once the cap is hit.
    pub fn advance(&mut self) -> Result<RoundIndex> {
        let next = self.check_advance()?;
        self.current_round = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_started() {
        let rs = RoundState::new(10);
        assert_eq!(rs.current(), 0);
        assert_eq!(rs.total(), 10);
        assert_eq!(rs.phase(), RoundPhase::NotStarted);
        assert!(!rs.is_started());
        assert_eq!(rs.remaining(), 10);
    }

    #[test]
    fn advance_walks_to_terminal() {
        let mut rs = RoundState::new(3);
        assert_eq!(rs.advance().unwrap(), 1);
        assert_eq!(rs.phase(), RoundPhase::Round(1));
        assert_eq!(rs.advance().unwrap(), 2);
        assert_eq!(rs.advance().unwrap(), 3);
        assert!(rs.is_final());

        let err = rs.advance().unwrap_err();
        assert!(matches!(
            err,
            LedgerError::RoundLimitReached { total_rounds: 3 }
        ));
        assert_eq!(rs.current(), 3);
    }

    #[test]
    fn check_advance_does_not_mutate() {
        let rs = RoundState::new(2);
        assert_eq!(rs.check_advance().unwrap(), 1);
        assert_eq!(rs.current(), 0);
    }

    #[test]
    fn phase_display() {
        assert_eq!(format!("{}", RoundPhase::NotStarted), "NOT_STARTED");
        assert_eq!(format!("{}", RoundPhase::Round(4)), "ROUND(4)");
    }

    #[test]
    fn serde_roundtrip() {
        let mut rs = RoundState::new(5);
        rs.advance().unwrap();
        let json = serde_json::to_string(&rs).unwrap();
        let back: RoundState = serde_json::from_str(&json).unwrap();
        assert_eq!(rs, back);
    }
}
