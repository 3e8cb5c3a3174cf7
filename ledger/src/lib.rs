// Copyright (c) 2026 Strata Contributors. MIT License.
// See LICENSE for details.

//! # STRATA Ledger — Embeddable Block Storage Engine
//!
//! STRATA is the durability and integrity layer of a blockchain node: it
//! persists an append-only chain of blocks, each carrying a batch of
//! transactions, and guarantees that every stored block is cryptographically
//! linked to its predecessor and that its transaction batch is tamper-evident.
//!
//! What STRATA deliberately is *not*: a consensus engine, a network stack, or
//! a transaction executor. The host node decides *which* block to commit;
//! STRATA decides whether that block is internally consistent and, if so,
//! makes it durable.
//!
//! ## Architecture
//!
//! The engine is split into modules that mirror its actual concerns:
//!
//! - **crypto** — BLAKE3 digest helpers. The one hash to rule them all.
//! - **transaction** — The content-addressed unit of work and its builder.
//! - **proof** — The Merkle proof engine: build, verify, and prove inclusion
//!   over a transaction batch.
//! - **block** — The block entity and its seal (the content-derived identity
//!   computed over the committed header fields).
//! - **chain** — The extension rule: height and previous-seal linkage.
//! - **storage** — The block store: validation pipeline, four derived
//!   indexes, and the key-value backend boundary.
//!
//! ## Data Flow
//!
//! ```text
//! Transaction batch ── MerkleProofEngine::build_tx_proof ──> TxProof
//!        │                                                     │
//!        └───────────────> Block (prev_seal, height, creator) <┘
//!                             │  set_timestamp + seal()
//!                             v
//!                    BlockStore::add_block
//!                             │  chain link ─ seal ─ tx proof
//!                             v
//!              one durable batch across four indexes
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Validation before durability — nothing is written until every check
//!    passes.
//! 2. A committed block is immutable. The store never rewrites history.
//! 3. "Could not compute" is an error; "computed but does not match" is a
//!    `false`. Callers must handle both.

pub mod block;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod proof;
pub mod storage;
pub mod transaction;

pub use block::seal::SealEngine;
pub use block::Block;
pub use chain::ChainValidator;
pub use proof::{MerkleProofEngine, ProofValidator, TxProof};
pub use storage::store::BlockStore;
pub use transaction::Transaction;
