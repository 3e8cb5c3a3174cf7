//! # Engine Configuration & Constants
//!
//! Every magic value in STRATA lives here. Table names and sentinel keys are
//! part of the on-disk format — changing them after a store has been created
//! orphans existing data, so treat them as frozen.

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// The digest used for transaction seals, Merkle nodes, and block seals.
pub const HASH_FUNCTION: &str = "BLAKE3";

/// Digest output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Chain Sentinels
// ---------------------------------------------------------------------------

/// The well-known `prev_seal` value of a genesis block (height 0).
///
/// A genesis block has no predecessor, so this sentinel stands in for the
/// previous seal in both the header and the seal digest.
pub const GENESIS_PREV_SEAL: &[u8] = b"genesis";

// ---------------------------------------------------------------------------
// Index Tables
// ---------------------------------------------------------------------------
//
// The store multiplexes its logical indexes over one physical keyspace by
// prefixing every raw key with `"<table>_"`. Four tables carry five lookup
// paths: the util table holds both the last-block pointer and the
// transaction-to-block mapping.

/// Table: block seal -> serialized block.
pub const TABLE_BLOCK_SEAL: &str = "block_seal";

/// Table: decimal block height -> block seal.
pub const TABLE_BLOCK_HEIGHT: &str = "block_height";

/// Table: transaction id -> serialized transaction.
pub const TABLE_TRANSACTION: &str = "transaction";

/// Table: the last-block pointer and transaction id -> block seal entries.
pub const TABLE_UTIL: &str = "util";

/// Fixed key in the util table pointing at the serialized chain head.
pub const LAST_BLOCK_KEY: &[u8] = b"last_block";
