//! # Storage Layer
//!
//! Persistence for the ledger engine. This module owns the key-value
//! backend boundary, the on-disk codec, and the block store that ties the
//! validation pipeline to durable index writes.
//!
//! ## Architecture
//!
//! ```text
//! kv.rs     — KvBackend trait, WriteBatch, sled + in-memory backends
//! codec.rs  — bincode encode/decode with explicit empty-input rejection
//! store.rs  — BlockStore: validate (chain link, seal, tx proof), commit
//! ```
//!
//! ## Index Layout
//!
//! Four logical tables are multiplexed over one physical keyspace by
//! prefixing raw keys with `"<table>_"`:
//!
//! | Table          | Key              | Value                  |
//! |----------------|------------------|------------------------|
//! | `block_seal`   | seal             | bincode(Block)         |
//! | `block_height` | decimal height   | seal                   |
//! | `transaction`  | tx id            | bincode(Transaction)   |
//! | `util`         | `last_block`     | bincode(Block)         |
//! | `util`         | tx id            | seal                   |
//!
//! ## Design Decisions
//!
//! 1. **Bincode for on-disk serialization.** Compact, fast, deterministic.
//!    JSON stays at the hashing boundary (canonical transaction bytes);
//!    bincode is for storage.
//!
//! 2. **One durable batch per commit.** All index writes for an accepted
//!    block are issued as a single `WriteBatch`. Backends that support
//!    atomic batches (sled) make the commit all-or-nothing; per-key-only
//!    backends degrade to a documented corruption window that is
//!    recoverable by rebuilding the secondary indexes from the seal table.

pub mod codec;
pub mod kv;
pub mod store;

pub use kv::{BackendError, KvBackend, MemoryBackend, SledBackend, WriteBatch};
pub use store::{BlockStore, StoreError};
