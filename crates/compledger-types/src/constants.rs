//! System-wide constants for the Compledger ledger.

/// Round index meaning "vesting has not started".
pub const ROUND_NOT_STARTED: u32 = 0;

/// Smallest permitted number of vesting rounds.
pub const MIN_TOTAL_ROUNDS: u32 = 1;

/// Default number of observation records retained in memory before the
/// oldest are evicted.
pub const DEFAULT_EVENT_RETENTION: usize = 10_000;

/// Default decimals for the reference token (ERC-20 convention).
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// `u128` holds at most 38 full decimal digits.
pub const MAX_TOKEN_DECIMALS: u8 = 38;

/// Domain separator mixed into every observation hash.
pub const EVENT_HASH_DOMAIN: &[u8] = b"compledger:event:v1:";

/// Hash that precedes the first observation in the chain.
pub const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Compledger";
