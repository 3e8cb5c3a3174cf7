//! # Chain Extension Rule
//!
//! Before a candidate block may be committed, it must correctly extend the
//! current chain head: consecutive height and a `prev_seal` that matches the
//! head's seal. Both conditions are mandatory — a matching seal at the wrong
//! height is as invalid as the right height behind a stale seal.
//!
//! The validator is stateless; the store hands it the candidate and the
//! current head on every call. Under a single-producer contract this check
//! also serves as a correctness backstop against late-arriving blocks whose
//! `prev_seal` no longer matches — it rejects them, it does not arbitrate
//! them.

use crate::block::Block;

/// Enforces height and previous-seal linkage for candidate blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainValidator;

impl ChainValidator {
    /// Create a chain validator. Stateless; `Default` works equally well.
    pub fn new() -> Self {
        Self
    }

    /// Does `candidate` correctly extend `head`?
    ///
    /// An empty chain (`head` is `None`) accepts any candidate at height 0.
    /// Otherwise the candidate must sit at `head.height + 1` and reference
    /// `head.seal` as its predecessor.
    pub fn is_extension(&self, candidate: &Block, head: Option<&Block>) -> bool {
        match head {
            None => candidate.height == 0,
            Some(head) => {
                candidate.height == head.height + 1 && candidate.prev_seal == head.seal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::SealEngine;
    use crate::proof::{MerkleProofEngine, ProofValidator};
    use crate::transaction::TransactionBuilder;

    fn sealed_block(prev_seal: Vec<u8>, height: u64) -> Block {
        let mut block = Block::unsealed(prev_seal, height, b"creator".to_vec()).unwrap();
        block.put_transaction(
            TransactionBuilder::new(format!("tx-{height}"))
                .invoke("noop", vec![])
                .timestamp(1_000 + height)
                .build(),
        );
        let proof = MerkleProofEngine::new()
            .build_tx_proof(&block.transactions)
            .unwrap();
        block.attach_proof(proof);
        block.set_timestamp(1_700_000_000_000 + height);
        block.seal(&SealEngine::new()).unwrap();
        block
    }

    #[test]
    fn empty_chain_accepts_height_zero_only() {
        let validator = ChainValidator::new();
        let genesis = sealed_block(b"genesis".to_vec(), 0);
        let not_genesis = sealed_block(b"genesis".to_vec(), 3);

        assert!(validator.is_extension(&genesis, None));
        assert!(!validator.is_extension(&not_genesis, None));
    }

    #[test]
    fn accepts_a_proper_extension() {
        let validator = ChainValidator::new();
        let head = sealed_block(b"genesis".to_vec(), 0);
        let next = sealed_block(head.seal.clone(), 1);

        assert!(validator.is_extension(&next, Some(&head)));
    }

    #[test]
    fn rejects_nonconsecutive_height_even_with_matching_seal() {
        let validator = ChainValidator::new();
        let head = sealed_block(b"genesis".to_vec(), 0);
        let skipped = sealed_block(head.seal.clone(), 2);

        assert!(!validator.is_extension(&skipped, Some(&head)));
    }

    #[test]
    fn rejects_mismatched_seal_even_with_consecutive_height() {
        let validator = ChainValidator::new();
        let head = sealed_block(b"genesis".to_vec(), 0);
        let stale = sealed_block(b"genesis".to_vec(), 1);

        assert!(!validator.is_extension(&stale, Some(&head)));
    }
}
