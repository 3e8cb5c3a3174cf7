//! # Merkle Proof Engine
//!
//! Builds and verifies the tamper-evidence structure over an ordered
//! transaction batch. The structure is a binary Merkle tree flattened into a
//! single level-order array, root first, leaves last — the whole array is
//! persisted with the block, not just the root, so independent inclusion
//! checks never need the original batch.
//!
//! ## Flat Array Encoding
//!
//! For a node at flat index `i`:
//!
//! - its children live at `2i + 1` and `2i + 2`, when `i` is not a leaf;
//! - `i` is a leaf position iff `2i + 2 >= len` (its would-be children fall
//!   off the end of the array).
//!
//! A batch of 3 transactions pads to 4 leaves and yields a 7-entry array:
//!
//! ```text
//! index   0      1      2      3      4      5      6
//!       [root, h01,   h23,   l0,    l1,    l2,    l2 ]   (l2 duplicated)
//! ```
//!
//! ## Padding Rule
//!
//! An odd *leaf* count is padded once by duplicating the last leaf hash.
//! The rule is deliberately not re-applied to intermediate levels: a padded
//! leaf count whose tree narrows to an odd intermediate width (6, 10, 12, …)
//! fails to build with [`ProofError::UnbalancedLevel`]. This is a known
//! limitation of the persisted format — repadding mid-tree would change
//! every seal derived from the root, breaking existing stores.

use serde::{Deserialize, Serialize};

use crate::crypto::blake3_hash_multi;
use crate::transaction::{Transaction, TxError};

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors raised while building a proof structure.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    /// A proof cannot be built over zero transactions.
    #[error("cannot build a proof over an empty transaction batch")]
    EmptyBatch,

    /// A transaction seal could not be computed.
    #[error("leaf hash computation failed: {0}")]
    HashFailure(#[from] TxError),

    /// An intermediate tree level has odd width. The padding rule applies
    /// only to the leaf level, so such batches cannot be represented.
    #[error("intermediate tree level has odd width {width}; padded leaf counts must collapse to one node by halving")]
    UnbalancedLevel {
        /// Width of the level that could not be paired.
        width: usize,
    },
}

// ---------------------------------------------------------------------------
// TxProof
// ---------------------------------------------------------------------------

/// The flat level-order Merkle array over a transaction batch.
///
/// Index 0 is the root — the batch's tamper-evidence digest that the block
/// seal commits to. The array layout is part of the on-disk format; see the
/// module docs for the index arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxProof {
    nodes: Vec<[u8; 32]>,
}

impl TxProof {
    /// Wrap an existing node array. Callers normally obtain proofs from
    /// [`MerkleProofEngine::build_tx_proof`]; this exists for decoding and
    /// for tests that construct corrupted structures on purpose.
    pub fn from_nodes(nodes: Vec<[u8; 32]>) -> Self {
        Self { nodes }
    }

    /// The root hash, or `None` for an empty structure.
    pub fn root(&self) -> Option<&[u8; 32]> {
        self.nodes.first()
    }

    /// Total number of nodes in the flat array.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no proof has been attached yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether flat index `i` is a leaf position: its computed children
    /// indices fall outside the array bounds.
    pub fn is_leaf_index(&self, i: usize) -> bool {
        2 * i + 2 >= self.nodes.len()
    }

    /// The raw node array, root first.
    pub fn nodes(&self) -> &[[u8; 32]] {
        &self.nodes
    }

    /// Level widths from root to leaves, derived from the array length.
    ///
    /// Purely diagnostic — the flat array remains the persisted form. For a
    /// well-formed proof this is `[1, 2, 4, …]`; the walk stops once the
    /// accounted nodes cover the array.
    pub fn level_widths(&self) -> Vec<usize> {
        let mut widths = Vec::new();
        let mut width = 1;
        let mut covered = 0;
        while covered < self.nodes.len() {
            let take = width.min(self.nodes.len() - covered);
            widths.push(take);
            covered += take;
            width *= 2;
        }
        widths
    }
}

// ---------------------------------------------------------------------------
// ProofValidator
// ---------------------------------------------------------------------------

/// The proof strategy a block store validates batches with.
///
/// Stateless by design — implementations carry configuration at most, never
/// chain state. [`MerkleProofEngine`] is the standard implementation; the
/// trait is the seam for hosts that persist a different proof shape.
pub trait ProofValidator: Send + Sync {
    /// Build the proof structure over an ordered batch.
    fn build_tx_proof(&self, transactions: &[Transaction]) -> Result<TxProof, ProofError>;

    /// Fully re-derive and check the structure against a batch.
    /// `Ok(false)` means "computed, does not match" — corruption is a
    /// semantic failure, not an exceptional one.
    fn validate_tx_proof(
        &self,
        proof: &TxProof,
        transactions: &[Transaction],
    ) -> Result<bool, ProofError>;

    /// Check that one transaction is a consistent member of the structure.
    fn validate_transaction(
        &self,
        proof: &TxProof,
        transaction: &Transaction,
    ) -> Result<bool, ProofError>;

    /// Compare an expected root against the structure's root.
    fn validate_root(&self, expected: &[u8], proof: &TxProof) -> bool {
        proof.root().map(|r| r.as_slice() == expected).unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// MerkleProofEngine
// ---------------------------------------------------------------------------

/// The standard binary-Merkle implementation of [`ProofValidator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MerkleProofEngine;

impl MerkleProofEngine {
    /// Create an engine. Stateless; `Default` works equally well.
    pub fn new() -> Self {
        Self
    }

    /// Leaf hashes of a batch in order, padded to even count by duplicating
    /// the last hash.
    fn padded_leaves(transactions: &[Transaction]) -> Result<Vec<[u8; 32]>, ProofError> {
        let mut leaves = Vec::with_capacity(transactions.len() + 1);
        for tx in transactions {
            leaves.push(tx.calculate_seal()?);
        }
        if leaves.len() % 2 != 0 {
            let last = leaves[leaves.len() - 1];
            leaves.push(last);
        }
        Ok(leaves)
    }
}

/// Parent hash of two adjacent nodes: `blake3(left || right)`, order-sensitive.
fn pair_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    blake3_hash_multi(&[left.as_slice(), right.as_slice()])
}

impl ProofValidator for MerkleProofEngine {
    fn build_tx_proof(&self, transactions: &[Transaction]) -> Result<TxProof, ProofError> {
        if transactions.is_empty() {
            return Err(ProofError::EmptyBatch);
        }

        let leaves = Self::padded_leaves(transactions)?;

        // Build levels bottom-up by pairing adjacent nodes left-to-right.
        let mut levels: Vec<Vec<[u8; 32]>> = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let current = &levels[levels.len() - 1];
            if current.len() % 2 != 0 {
                return Err(ProofError::UnbalancedLevel {
                    width: current.len(),
                });
            }
            let next: Vec<[u8; 32]> = current
                .chunks(2)
                .map(|pair| pair_hash(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }

        // Emit in level order, root first down to the padded leaves.
        let mut nodes = Vec::with_capacity(levels.iter().map(Vec::len).sum());
        for level in levels.iter().rev() {
            nodes.extend_from_slice(level);
        }
        Ok(TxProof { nodes })
    }

    fn validate_tx_proof(
        &self,
        proof: &TxProof,
        transactions: &[Transaction],
    ) -> Result<bool, ProofError> {
        if proof.is_empty() || transactions.is_empty() {
            return Ok(false);
        }

        // Re-derive the expected leaf hashes, including the odd-count
        // duplicate, then walk the array position by position.
        let expected_leaves = Self::padded_leaves(transactions)?;
        let nodes = &proof.nodes;
        let mut leaf_cursor = 0;

        for i in 0..nodes.len() {
            if proof.is_leaf_index(i) {
                if leaf_cursor >= expected_leaves.len()
                    || nodes[i] != expected_leaves[leaf_cursor]
                {
                    return Ok(false);
                }
                leaf_cursor += 1;
            } else {
                let combined = pair_hash(&nodes[2 * i + 1], &nodes[2 * i + 2]);
                if nodes[i] != combined {
                    return Ok(false);
                }
            }
        }

        // Every derived leaf must have been consumed: a proof with fewer
        // leaf positions than the batch is not a proof of this batch.
        Ok(leaf_cursor == expected_leaves.len())
    }

    fn validate_transaction(
        &self,
        proof: &TxProof,
        transaction: &Transaction,
    ) -> Result<bool, ProofError> {
        let leaf = transaction.calculate_seal()?;
        let nodes = &proof.nodes;

        // Take the last match so that a padded duplicate resolves to the
        // final leaf position rather than an interior duplicate.
        let Some(mut index) = nodes.iter().rposition(|n| *n == leaf) else {
            return Ok(false);
        };

        // Climb sibling/parent indices to the root, re-deriving each parent
        // with the correct left/right operand order.
        while index > 0 {
            let (left, right, parent) = if index % 2 == 0 {
                // Right child: sibling sits just before it.
                (index - 1, index, (index - 1) / 2)
            } else {
                // Left child: sibling sits just after it.
                (index, index + 1, index / 2)
            };

            if right >= nodes.len() {
                return Ok(false);
            }
            if pair_hash(&nodes[left], &nodes[right]) != nodes[parent] {
                return Ok(false);
            }
            index = parent;
        }

        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionBuilder;

    fn make_batch(count: usize) -> Vec<Transaction> {
        (0..count)
            .map(|i| {
                TransactionBuilder::new(format!("tx{i:02}"))
                    .invoke("put", vec![format!("key{i}"), format!("value{i}")])
                    .timestamp(1_000_000 + i as u64)
                    .build()
            })
            .collect()
    }

    #[test]
    fn empty_batch_rejected() {
        let engine = MerkleProofEngine::new();
        assert!(matches!(
            engine.build_tx_proof(&[]),
            Err(ProofError::EmptyBatch)
        ));
    }

    #[test]
    fn single_transaction_pads_to_two_leaves() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(1);
        let proof = engine.build_tx_proof(&batch).unwrap();

        // 2 padded leaves + 1 root.
        assert_eq!(proof.len(), 3);
        assert!(!proof.is_leaf_index(0));
        assert!(proof.is_leaf_index(1));
        assert!(proof.is_leaf_index(2));
        assert_eq!(proof.nodes()[1], proof.nodes()[2]);
    }

    #[test]
    fn three_transactions_yield_seven_entries() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(3);
        let proof = engine.build_tx_proof(&batch).unwrap();

        // 4 padded leaves + 2 intermediate + 1 root.
        assert_eq!(proof.len(), 7);
        assert_eq!(proof.level_widths(), vec![1, 2, 4]);

        // The padded duplicate is the last transaction's hash.
        let last_seal = batch[2].calculate_seal().unwrap();
        assert_eq!(proof.nodes()[5], last_seal);
        assert_eq!(proof.nodes()[6], last_seal);
    }

    #[test]
    fn roundtrip_validates_for_common_batch_sizes() {
        let engine = MerkleProofEngine::new();
        for count in [1, 2, 3, 4, 8] {
            let batch = make_batch(count);
            let proof = engine.build_tx_proof(&batch).unwrap();
            assert!(
                engine.validate_tx_proof(&proof, &batch).unwrap(),
                "batch of {count} should round-trip"
            );
        }
    }

    #[test]
    fn odd_intermediate_level_fails_to_build() {
        // 6 leaves halve to a 3-wide level that cannot be paired.
        let engine = MerkleProofEngine::new();
        let batch = make_batch(6);
        assert!(matches!(
            engine.build_tx_proof(&batch),
            Err(ProofError::UnbalancedLevel { width: 3 })
        ));

        // 5 transactions pad to the same 6-leaf shape.
        let batch = make_batch(5);
        assert!(matches!(
            engine.build_tx_proof(&batch),
            Err(ProofError::UnbalancedLevel { width: 3 })
        ));
    }

    #[test]
    fn root_commits_to_order() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(4);
        let mut reversed = batch.clone();
        reversed.reverse();

        let a = engine.build_tx_proof(&batch).unwrap();
        let b = engine.build_tx_proof(&reversed).unwrap();
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn tampered_leaf_fails_full_validation() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(4);
        let proof = engine.build_tx_proof(&batch).unwrap();

        let mut nodes = proof.nodes().to_vec();
        nodes[4][0] ^= 0xFF; // flip one leaf byte
        let corrupted = TxProof::from_nodes(nodes);

        assert!(!engine.validate_tx_proof(&corrupted, &batch).unwrap());
    }

    #[test]
    fn tampered_intermediate_fails_full_validation() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(4);
        let proof = engine.build_tx_proof(&batch).unwrap();

        let mut nodes = proof.nodes().to_vec();
        nodes[1][0] ^= 0xFF;
        let corrupted = TxProof::from_nodes(nodes);

        assert!(!engine.validate_tx_proof(&corrupted, &batch).unwrap());
    }

    #[test]
    fn validation_fails_against_a_different_batch() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(4);
        let proof = engine.build_tx_proof(&batch).unwrap();

        let mut other = make_batch(4);
        other[2] = TransactionBuilder::new("intruder")
            .raw_payload(vec![9, 9, 9])
            .timestamp(7)
            .build();

        assert!(!engine.validate_tx_proof(&proof, &other).unwrap());
    }

    #[test]
    fn inclusion_holds_for_every_member() {
        let engine = MerkleProofEngine::new();
        for count in [1, 2, 3, 4, 8] {
            let batch = make_batch(count);
            let proof = engine.build_tx_proof(&batch).unwrap();
            for tx in &batch {
                assert!(
                    engine.validate_transaction(&proof, tx).unwrap(),
                    "member of a {count}-batch should prove inclusion"
                );
            }
        }
    }

    #[test]
    fn inclusion_fails_for_non_member() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(4);
        let proof = engine.build_tx_proof(&batch).unwrap();

        let outsider = TransactionBuilder::new("outsider")
            .query("balance", vec!["nobody".into()])
            .timestamp(1)
            .build();

        assert!(!engine.validate_transaction(&proof, &outsider).unwrap());
    }

    #[test]
    fn inclusion_fails_when_path_is_corrupted() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(4);
        let proof = engine.build_tx_proof(&batch).unwrap();

        // Corrupt the sibling on tx0's path; tx0's own leaf stays intact.
        let mut nodes = proof.nodes().to_vec();
        nodes[4][0] ^= 0xFF;
        let corrupted = TxProof::from_nodes(nodes);

        assert!(!engine.validate_transaction(&corrupted, &batch[0]).unwrap());
    }

    #[test]
    fn validate_root_compares_bytes() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(2);
        let proof = engine.build_tx_proof(&batch).unwrap();

        let root = *proof.root().unwrap();
        assert!(engine.validate_root(&root, &proof));
        assert!(!engine.validate_root(&[0u8; 32], &proof));
        assert!(!engine.validate_root(&root, &TxProof::default()));
    }

    #[test]
    fn proof_serialization_roundtrip() {
        let engine = MerkleProofEngine::new();
        let batch = make_batch(3);
        let proof = engine.build_tx_proof(&batch).unwrap();

        let bytes = bincode::serialize(&proof).expect("serialize");
        let recovered: TxProof = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(proof, recovered);
    }
}
