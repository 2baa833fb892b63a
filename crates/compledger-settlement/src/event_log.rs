//! Bounded, hash-chained observation log.
//!
//! Each committed state change is appended as an [`EventRecord`]. Sequence
//! numbers and the hash chain continue across evictions and drains, so an
//! indexer that consumes records in batches can still verify continuity.
//!
//! When the log holds `max_retained` records the oldest is evicted to make
//! room, keeping memory bounded in long-running ledgers.

use std::collections::VecDeque;

use compledger_types::{EventRecord, LedgerError, LedgerEvent, Result, constants};

/// Append-only event stream with oldest-first eviction.
#[derive(Debug)]
pub struct EventLog {
    /// Retained records (front = oldest).
    records: VecDeque<EventRecord>,
    /// Maximum number of records before eviction kicks in.
    max_retained: usize,
    next_sequence: u64,
    last_hash: [u8; 32],
}

impl EventLog {
    /// Create a new log retaining at most `max_retained` records.
    ///
    /// # Errors
    /// Returns `Configuration` if `max_retained` is zero.
    pub fn new(max_retained: usize) -> Result<Self> {
        if max_retained == 0 {
            return Err(LedgerError::Configuration(
                "event log max_retained must be > 0".into(),
            ));
        }
        Ok(Self {
            records: VecDeque::new(),
            max_retained,
            next_sequence: 0,
            last_hash: constants::GENESIS_HASH,
        })
    }

    /// Append an observation and return its sequence number.
    pub fn append(&mut self, event: LedgerEvent) -> u64 {
        if self.records.len() >= self.max_retained {
            self.records.pop_front();
        }

        let sequence = self.next_sequence;
        let record = EventRecord::new(sequence, event, self.last_hash);
        tracing::debug!(
            sequence,
            kind = record.event.kind(),
            hash = %record.hash_hex(),
            "Observation recorded"
        );
        self.last_hash = record.hash;
        self.next_sequence += 1;
        self.records.push_back(record);
        sequence
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Most recent record, if any is retained.
    #[must_use]
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.back()
    }

    /// Hand all retained records to the caller. The chain continues.
    pub fn drain(&mut self) -> Vec<EventRecord> {
        self.records.drain(..).collect()
    }

    /// Check every retained record's hash and its link to its predecessor.
    ///
    /// # Errors
    /// Returns [`LedgerError::EventChainBroken`] at the first bad record.
    pub fn verify_chain(&self) -> Result<()> {
        let mut expected_prev: Option<[u8; 32]> = None;
        let mut expected_seq: Option<u64> = None;
        for record in &self.records {
            let linked = expected_prev.is_none_or(|prev| prev == record.prev_hash);
            let in_order = expected_seq.is_none_or(|seq| seq == record.sequence);
            let genesis_ok = record.sequence != 0 || record.prev_hash == constants::GENESIS_HASH;
            if !(linked && in_order && genesis_ok && record.verify()) {
                return Err(LedgerError::EventChainBroken {
                    sequence: record.sequence,
                });
            }
            expected_prev = Some(record.hash);
            expected_seq = Some(record.sequence + 1);
        }
        Ok(())
    }

    /// Sequence number the next record will get.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Hash of the most recent record ever appended.
    #[must_use]
    pub fn last_hash(&self) -> [u8; 32] {
        self.last_hash
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
