//! Observation records for external auditors and indexers.
//!
//! Every committed state change produces a [`LedgerEvent`]. The ledger wraps
//! each one in an [`EventRecord`] carrying a sequence number and a SHA-256
//! hash chained to the previous record, so an indexer can detect gaps or
//! tampering. Observations are not part of ledger state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, Amount, RoundIndex, constants};

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// An entitlement was written (single or batch entry).
    EntitlementSet {
        recipient: AccountId,
        claim_limit: Amount,
    },
    /// The admin pulled value into the pool.
    Refill {
        admin: AccountId,
        amount: Amount,
        total_available: Amount,
    },
    /// The round counter moved forward.
    RoundAdvanced {
        round: RoundIndex,
        total_rounds: RoundIndex,
    },
    /// A claim was settled and paid out.
    Claim { recipient: AccountId, amount: Amount },
}

impl LedgerEvent {
    /// Short uppercase tag for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EntitlementSet { .. } => "ENTITLEMENT_SET",
            Self::Refill { .. } => "REFILL",
            Self::RoundAdvanced { .. } => "ROUND_ADVANCED",
            Self::Claim { .. } => "CLAIM",
        }
    }

    fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update(self.kind().as_bytes());
        match self {
            Self::EntitlementSet {
                recipient,
                claim_limit,
            } => {
                hasher.update(recipient.as_bytes());
                hasher.update(claim_limit.to_le_bytes());
            }
            Self::Refill {
                admin,
                amount,
                total_available,
            } => {
                hasher.update(admin.as_bytes());
                hasher.update(amount.to_le_bytes());
                hasher.update(total_available.to_le_bytes());
            }
            Self::RoundAdvanced {
                round,
                total_rounds,
            } => {
                hasher.update(round.to_le_bytes());
                hasher.update(total_rounds.to_le_bytes());
            }
            Self::Claim { recipient, amount } => {
                hasher.update(recipient.as_bytes());
                hasher.update(amount.to_le_bytes());
            }
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// A sequenced, hash-chained observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the ledger's event stream (0-based, never reused).
    pub sequence: u64,
    pub event: LedgerEvent,
    pub emitted_at: DateTime<Utc>,
    /// Hash of the preceding record ([`constants::GENESIS_HASH`] for the first).
    pub prev_hash: [u8; 32],
    /// SHA-256 over (domain || sequence || prev_hash || event).
    pub hash: [u8; 32],
}

impl EventRecord {
    /// Build a record, computing its chained hash.
    #[must_use]
    pub fn new(sequence: u64, event: LedgerEvent, prev_hash: [u8; 32]) -> Self {
        let hash = Self::compute_hash(sequence, &event, &prev_hash);
        Self {
            sequence,
            event,
            emitted_at: Utc::now(),
            prev_hash,
            hash,
        }
    }

    /// `emitted_at` is not part of the hash.
    #[must_use]
    pub fn compute_hash(sequence: u64, event: &LedgerEvent, prev_hash: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::EVENT_HASH_DOMAIN);
        hasher.update(sequence.to_le_bytes());
        hasher.update(prev_hash);
        event.hash_into(&mut hasher);
        hasher.finalize().into()
    }

    /// Whether `hash` matches the record's contents.
    #[must_use]
    pub fn verify(&self) -> bool {
        Self::compute_hash(self.sequence, &self.event, &self.prev_hash) == self.hash
    }

    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}
