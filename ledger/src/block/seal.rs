//! # Block Seals
//!
//! A block's seal is its content-derived identity: the BLAKE3 digest over
//! the committed header fields. The seal is what the next block's
//! `prev_seal` points at, which is what makes the chain a chain.
//!
//! The digest covers `prev_seal || proof_root || timestamp` (little-endian
//! millis). The creator is required to be present before sealing but does
//! not contribute to the digest — two blocks differing only in creator
//! carry identical seals. That asymmetry is inherited from the persisted
//! format and must not change without migrating every existing store.

use crate::block::Block;
use crate::crypto::blake3_hash_multi;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors raised while computing or checking a block seal.
#[derive(Debug, thiserror::Error)]
pub enum SealError {
    /// A header field required for sealing is empty or unset.
    #[error("previous seal, tx proof, timestamp, or creator is not set")]
    IncompleteHeader,
}

// ---------------------------------------------------------------------------
// SealEngine
// ---------------------------------------------------------------------------

/// Computes and checks block seals. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct SealEngine;

impl SealEngine {
    /// Create a seal engine. Stateless; `Default` works equally well.
    pub fn new() -> Self {
        Self
    }

    /// Compute the seal from a block's own header fields.
    ///
    /// # Errors
    ///
    /// [`SealError::IncompleteHeader`] when prev_seal, the proof, the
    /// timestamp, or the creator is empty/unset. The creator check is a
    /// presence check only — see the module docs for why it stays out of
    /// the digest.
    pub fn compute_seal(&self, block: &Block) -> Result<Vec<u8>, SealError> {
        let root = block.tx_proof.root().ok_or(SealError::IncompleteHeader)?;
        if block.prev_seal.is_empty() || block.creator.is_empty() {
            return Err(SealError::IncompleteHeader);
        }
        let timestamp = block.timestamp.ok_or(SealError::IncompleteHeader)?;

        let digest = blake3_hash_multi(&[
            block.prev_seal.as_slice(),
            root.as_slice(),
            &timestamp.to_le_bytes(),
        ]);
        Ok(digest.to_vec())
    }

    /// Recompute the seal from the block's fields and compare.
    ///
    /// `Ok(false)` means "computed, does not match" — a mismatch gates the
    /// candidate block but is not an exceptional condition.
    pub fn validate_seal(&self, claimed: &[u8], block: &Block) -> Result<bool, SealError> {
        Ok(self.compute_seal(block)? == claimed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::{MerkleProofEngine, ProofValidator};
    use crate::transaction::TransactionBuilder;

    fn ready_block() -> Block {
        let mut block = Block::genesis(b"creator-1".to_vec()).unwrap();
        block.put_transaction(
            TransactionBuilder::new("tx01")
                .invoke("noop", vec![])
                .timestamp(1_000)
                .build(),
        );
        let proof = MerkleProofEngine::new()
            .build_tx_proof(&block.transactions)
            .unwrap();
        block.attach_proof(proof);
        block.set_timestamp(1_700_000_000_000);
        block
    }

    #[test]
    fn compute_is_deterministic() {
        let seals = SealEngine::new();
        let block = ready_block();
        assert_eq!(
            seals.compute_seal(&block).unwrap(),
            seals.compute_seal(&block).unwrap()
        );
    }

    #[test]
    fn each_digest_input_changes_the_seal() {
        let seals = SealEngine::new();
        let block = ready_block();
        let base = seals.compute_seal(&block).unwrap();

        let mut other_prev = block.clone();
        other_prev.prev_seal = b"different".to_vec();
        assert_ne!(seals.compute_seal(&other_prev).unwrap(), base);

        let mut other_ts = block.clone();
        other_ts.set_timestamp(1_700_000_000_001);
        assert_ne!(seals.compute_seal(&other_ts).unwrap(), base);

        let mut other_root = block.clone();
        other_root.put_transaction(
            TransactionBuilder::new("tx02")
                .invoke("noop", vec![])
                .timestamp(2_000)
                .build(),
        );
        let proof = MerkleProofEngine::new()
            .build_tx_proof(&other_root.transactions)
            .unwrap();
        other_root.attach_proof(proof);
        assert_ne!(seals.compute_seal(&other_root).unwrap(), base);
    }

    #[test]
    fn creator_does_not_change_the_seal() {
        let seals = SealEngine::new();
        let block = ready_block();
        let mut other_creator = block.clone();
        other_creator.creator = b"creator-2".to_vec();

        assert_eq!(
            seals.compute_seal(&block).unwrap(),
            seals.compute_seal(&other_creator).unwrap()
        );
    }

    #[test]
    fn incomplete_header_rejected() {
        let seals = SealEngine::new();

        let mut no_proof = Block::genesis(b"c".to_vec()).unwrap();
        no_proof.set_timestamp(1);
        assert!(matches!(
            seals.compute_seal(&no_proof),
            Err(SealError::IncompleteHeader)
        ));

        let mut no_timestamp = ready_block();
        no_timestamp.timestamp = None;
        assert!(matches!(
            seals.compute_seal(&no_timestamp),
            Err(SealError::IncompleteHeader)
        ));

        let mut no_creator = ready_block();
        no_creator.creator = Vec::new();
        assert!(matches!(
            seals.compute_seal(&no_creator),
            Err(SealError::IncompleteHeader)
        ));
    }

    #[test]
    fn validate_distinguishes_mismatch_from_error() {
        let seals = SealEngine::new();
        let mut block = ready_block();
        block.seal(&seals).unwrap();

        assert!(seals.validate_seal(&block.seal, &block).unwrap());

        let mut wrong = block.seal.clone();
        wrong[0] ^= 0xFF;
        assert!(!seals.validate_seal(&wrong, &block).unwrap());

        // An unsealable block is an error, not a false.
        block.timestamp = None;
        assert!(seals.validate_seal(&block.seal, &block).is_err());
    }
}
