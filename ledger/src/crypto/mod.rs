//! Cryptographic primitives for the ledger engine.
//!
//! STRATA treats the hash as a black box with one contract: a deterministic,
//! collision-resistant, fixed-length digest of an arbitrary byte string.
//! Everything else in the engine is built on top of that contract.

pub mod hash;

pub use hash::{blake3_hash, blake3_hash_multi};
