//! # Block Store
//!
//! The orchestrator: every candidate block passes the full validation
//! pipeline — chain linkage, seal, transaction proof — before a single byte
//! is written, and an accepted block is committed across all four indexes
//! as one durable batch.
//!
//! ## Commit Pipeline
//!
//! ```text
//! 1. SERIALIZE — encode the candidate (codec errors surfaced as-is)
//! 2. HEAD      — fetch the current chain head from the last-block index
//! 3. LINK      — ChainValidator::is_extension, or ChainLinkMismatch
//! 4. SEAL      — SealEngine::validate_seal, or SealValidation
//! 5. PROOF     — ProofValidator::validate_tx_proof, or TxProofValidation
//! 6. COMMIT    — one durable WriteBatch across the four indexes
//! ```
//!
//! The seal-index entry is queued first within the batch, so on a
//! per-key-durability backend a crash mid-commit can leave stale secondary
//! indexes but never a dangling seal entry. Rebuilding the secondary
//! indexes from the seal table recovers the rest.
//!
//! ## Concurrency Contract
//!
//! `add_block` is single-producer: one caller at a time per store instance,
//! serialized externally (typically by consensus sequencing). Read paths
//! may run concurrently with each other and with one in-flight `add_block`.

use tracing::{debug, info};

use crate::block::{Block, SealEngine, SealError};
use crate::chain::ChainValidator;
use crate::config::{
    LAST_BLOCK_KEY, TABLE_BLOCK_HEIGHT, TABLE_BLOCK_SEAL, TABLE_TRANSACTION, TABLE_UTIL,
};
use crate::proof::{MerkleProofEngine, ProofError, ProofValidator};
use crate::storage::codec::{self, CodecError};
use crate::storage::kv::{table_key, BackendError, KvBackend, SledBackend, WriteBatch};
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors surfaced by block store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was opened without a proof validator and cannot accept
    /// blocks. Read paths remain available.
    #[error("store has no proof validator; blocks cannot be added")]
    NoValidator,

    /// The candidate does not extend the current chain head.
    #[error("height or previous seal does not match the chain head (candidate height {candidate_height}, head height {head_height:?})")]
    ChainLinkMismatch {
        /// Height claimed by the candidate.
        candidate_height: u64,
        /// Height of the current head, if the chain is non-empty.
        head_height: Option<u64>,
    },

    /// The candidate's seal does not match its own header fields.
    #[error("block seal does not match the recomputed header digest")]
    SealValidation,

    /// The candidate's proof structure does not match its transaction batch.
    #[error("transaction proof does not match the transaction batch")]
    TxProofValidation,

    /// Seal computation failed on an incomplete header.
    #[error(transparent)]
    Seal(#[from] SealError),

    /// Proof construction or verification could not run.
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// Serialization codec failure, surfaced unmodified.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Storage backend failure, surfaced unmodified.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

// ---------------------------------------------------------------------------
// BlockStore
// ---------------------------------------------------------------------------

/// Durable, validated block storage over a key-value backend.
///
/// Holds the stateless validation strategies: the chain extension rule, the
/// seal engine, and an injectable proof validator. The store itself carries
/// no chain state beyond what lives in the backend — the chain head is
/// always read from the last-block index.
pub struct BlockStore<B: KvBackend> {
    backend: B,
    chain: ChainValidator,
    seals: SealEngine,
    validator: Option<Box<dyn ProofValidator>>,
}

impl BlockStore<SledBackend> {
    /// Open or create a sled-backed store at the given path, with the
    /// standard Merkle proof engine.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self::with_backend(SledBackend::open(path)?))
    }

    /// Create a temporary sled-backed store cleaned up on drop.
    pub fn open_temporary() -> Result<Self, StoreError> {
        Ok(Self::with_backend(SledBackend::open_temporary()?))
    }
}

impl<B: KvBackend> BlockStore<B> {
    /// Wrap any backend with the standard Merkle proof engine.
    pub fn with_backend(backend: B) -> Self {
        Self::with_validator(backend, Box::new(MerkleProofEngine::new()))
    }

    /// Wrap a backend with a custom proof strategy.
    pub fn with_validator(backend: B, validator: Box<dyn ProofValidator>) -> Self {
        Self {
            backend,
            chain: ChainValidator::new(),
            seals: SealEngine::new(),
            validator: Some(validator),
        }
    }

    /// Open a store for lookups only. `add_block` fails with
    /// [`StoreError::NoValidator`] before touching the backend — intended
    /// for read-side consumers that must never commit.
    pub fn lookup_only(backend: B) -> Self {
        Self {
            backend,
            chain: ChainValidator::new(),
            seals: SealEngine::new(),
            validator: None,
        }
    }

    // -- Commit path --------------------------------------------------------

    /// Validate a candidate block and commit it across the four indexes.
    ///
    /// Fail-fast: nothing is written unless every check passes, and the
    /// writes for one call are issued as a single durable batch. A rejected
    /// candidate leaves the store untouched.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoValidator`], [`StoreError::ChainLinkMismatch`],
    /// [`StoreError::SealValidation`], [`StoreError::TxProofValidation`],
    /// plus pass-through codec, seal-precondition, proof, and backend
    /// errors.
    pub fn add_block(&self, block: &Block) -> Result<(), StoreError> {
        let validator = self.validator.as_ref().ok_or(StoreError::NoValidator)?;

        let serialized = codec::encode(block)?;
        let head = self.get_last_block()?;

        if !self.chain.is_extension(block, head.as_ref()) {
            debug!(
                candidate_height = block.height,
                head_height = head.as_ref().map(|h| h.height),
                "rejecting block: not an extension of the chain head"
            );
            return Err(StoreError::ChainLinkMismatch {
                candidate_height: block.height,
                head_height: head.map(|h| h.height),
            });
        }

        if !self.seals.validate_seal(&block.seal, block)? {
            debug!(height = block.height, "rejecting block: seal mismatch");
            return Err(StoreError::SealValidation);
        }

        if !validator.validate_tx_proof(&block.tx_proof, &block.transactions)? {
            debug!(height = block.height, "rejecting block: tx proof mismatch");
            return Err(StoreError::TxProofValidation);
        }

        // The seal entry goes first: on a per-key backend it is the one
        // index the others can be rebuilt from.
        let mut batch = WriteBatch::new();
        batch.put(table_key(TABLE_BLOCK_SEAL, &block.seal), serialized.clone());
        batch.put(
            table_key(TABLE_BLOCK_HEIGHT, block.height.to_string().as_bytes()),
            block.seal.clone(),
        );
        batch.put(table_key(TABLE_UTIL, LAST_BLOCK_KEY), serialized);
        for tx in &block.transactions {
            batch.put(
                table_key(TABLE_TRANSACTION, tx.id.as_bytes()),
                codec::encode(tx)?,
            );
            batch.put(table_key(TABLE_UTIL, tx.id.as_bytes()), block.seal.clone());
        }
        self.backend.batch_write(batch, true)?;

        info!(
            height = block.height,
            seal = %block.seal_hex(),
            tx_count = block.tx_count(),
            "block committed"
        );
        Ok(())
    }

    // -- Read paths ---------------------------------------------------------

    /// Fetch a block by its seal. Pure lookup, no validation.
    pub fn get_block_by_seal(&self, seal: &[u8]) -> Result<Option<Block>, StoreError> {
        match self.backend.get(&table_key(TABLE_BLOCK_SEAL, seal))? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Fetch a block by its height, indirectly through the seal index.
    pub fn get_block_by_height(&self, height: u64) -> Result<Option<Block>, StoreError> {
        let key = table_key(TABLE_BLOCK_HEIGHT, height.to_string().as_bytes());
        match self.backend.get(&key)? {
            Some(seal) => self.get_block_by_seal(&seal),
            None => Ok(None),
        }
    }

    /// Fetch the block containing a transaction, indirectly through the
    /// transaction-to-seal entry in the util table.
    pub fn get_block_by_tx_id(&self, tx_id: &str) -> Result<Option<Block>, StoreError> {
        match self.backend.get(&table_key(TABLE_UTIL, tx_id.as_bytes()))? {
            Some(seal) => self.get_block_by_seal(&seal),
            None => Ok(None),
        }
    }

    /// Fetch a transaction by its id.
    pub fn get_transaction_by_id(&self, tx_id: &str) -> Result<Option<Transaction>, StoreError> {
        match self
            .backend
            .get(&table_key(TABLE_TRANSACTION, tx_id.as_bytes()))?
        {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Fetch the chain head from the last-block pointer.
    pub fn get_last_block(&self) -> Result<Option<Block>, StoreError> {
        match self.backend.get(&table_key(TABLE_UTIL, LAST_BLOCK_KEY))? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Borrow the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl BlockStore<SledBackend> {
    /// Block until pending writes are durable.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.backend.flush()?;
        Ok(())
    }

    /// Flush and consume the store.
    pub fn close(self) -> Result<(), StoreError> {
        self.backend.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
