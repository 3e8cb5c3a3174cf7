//! # Blocks
//!
//! A block is a batch of transactions plus the linkage metadata that chains
//! it to its predecessor. STRATA blocks are built incrementally by the
//! producer and sealed exactly once:
//!
//! ```text
//! Block::unsealed(prev_seal, height, creator)
//!     │  put_transaction() × N
//!     │  attach_proof(engine.build_tx_proof(..))
//!     │  set_timestamp(..)
//!     v
//! block.seal(&SealEngine)     — computes the content-derived identity
//! ```
//!
//! Sealing fails until `prev_seal`, the proof, the timestamp, and the
//! creator are all populated. Once sealed and committed the block is
//! immutable; the store never rewrites it.

use serde::{Deserialize, Serialize};

use crate::config::GENESIS_PREV_SEAL;
use crate::proof::TxProof;
use crate::transaction::Transaction;

pub mod seal;

pub use seal::{SealEngine, SealError};

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors raised while constructing a block.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// A required constructor argument was empty.
    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(&'static str),
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A batch of transactions plus chain linkage metadata.
///
/// Field order matters to nobody but the codec; what matters is the
/// lifecycle: `seal` stays empty and `timestamp` stays `None` until the
/// producer finishes populating the header and calls [`Block::seal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Content hash of the header. Empty until the block is sealed.
    pub seal: Vec<u8>,

    /// Seal of the chain predecessor, or the genesis sentinel for height 0.
    pub prev_seal: Vec<u8>,

    /// Chain height. Strictly `previous height + 1`, except genesis at 0.
    pub height: u64,

    /// Ordered transaction batch. Insertion order determines leaf order in
    /// the proof structure.
    pub transactions: Vec<Transaction>,

    /// Merkle proof structure over `transactions`.
    pub tx_proof: TxProof,

    /// Unix timestamp in milliseconds. `None` until set by the producer.
    pub timestamp: Option<u64>,

    /// Identity of the block producer. Opaque bytes.
    pub creator: Vec<u8>,
}

impl Block {
    /// Start an unsealed block.
    ///
    /// # Errors
    ///
    /// [`BlockError::MissingRequiredParameter`] when `prev_seal` or
    /// `creator` is empty — both are required before anything else can
    /// happen to the block.
    pub fn unsealed(
        prev_seal: Vec<u8>,
        height: u64,
        creator: Vec<u8>,
    ) -> Result<Self, BlockError> {
        if prev_seal.is_empty() {
            return Err(BlockError::MissingRequiredParameter("prev_seal"));
        }
        if creator.is_empty() {
            return Err(BlockError::MissingRequiredParameter("creator"));
        }

        Ok(Self {
            seal: Vec::new(),
            prev_seal,
            height,
            transactions: Vec::new(),
            tx_proof: TxProof::default(),
            timestamp: None,
            creator,
        })
    }

    /// Start an unsealed genesis block: height 0, the well-known sentinel
    /// in place of a predecessor seal.
    pub fn genesis(creator: Vec<u8>) -> Result<Self, BlockError> {
        Self::unsealed(GENESIS_PREV_SEAL.to_vec(), 0, creator)
    }

    /// Append a transaction to the batch. Order is significant.
    pub fn put_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Attach the proof structure built over this block's batch.
    pub fn attach_proof(&mut self, proof: TxProof) {
        self.tx_proof = proof;
    }

    /// Set the production timestamp (unix millis).
    pub fn set_timestamp(&mut self, millis: u64) {
        self.timestamp = Some(millis);
    }

    /// Compute and store this block's seal.
    ///
    /// # Errors
    ///
    /// [`SealError::IncompleteHeader`] when any of prev_seal, proof,
    /// timestamp, or creator is still unset.
    pub fn seal(&mut self, engine: &SealEngine) -> Result<(), SealError> {
        self.seal = engine.compute_seal(self)?;
        Ok(())
    }

    /// Whether the block has been sealed and is ready to submit.
    pub fn is_sealed(&self) -> bool {
        !self.seal.is_empty()
    }

    /// The seal as a hex string, for logs and display.
    pub fn seal_hex(&self) -> String {
        hex::encode(&self.seal)
    }

    /// Number of transactions in the batch.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
