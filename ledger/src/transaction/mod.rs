//! # Transactions
//!
//! The transaction is the opaque, content-addressed unit a block carries.
//! STRATA does not execute transactions — it stores them, proves their
//! membership in a block, and hands them back on lookup. The payload schema
//! belongs to the host application; the engine only requires that it
//! serializes deterministically.
//!
//! ## Seals
//!
//! A transaction's *seal* is the BLAKE3 digest of its canonical JSON
//! serialization — a pure function of every field. There is no stored seal
//! field on the transaction itself (no self-reference), so the seal can be
//! recomputed at any time and compared against a Merkle leaf.

use serde::{Deserialize, Serialize};

use crate::crypto::blake3_hash;

pub mod builder;

pub use builder::TransactionBuilder;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors raised while computing a transaction seal.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    /// The canonical serialization of the transaction failed, so its seal
    /// cannot be computed.
    #[error("transaction hash failed: {0}")]
    HashFailure(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// TxPayload
// ---------------------------------------------------------------------------

/// The host-application payload carried by a transaction.
///
/// The engine never interprets a payload; the variants exist so that hosts
/// with an RPC-shaped workload get a structured form while everything else
/// rides in `Raw`. All variants serialize deterministically, which is the
/// only property the seal computation relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxPayload {
    /// A state-changing call: function name plus positional arguments.
    Invoke {
        /// Name of the function to invoke.
        function: String,
        /// Positional string arguments.
        args: Vec<String>,
    },
    /// A read-only call with the same shape as `Invoke`.
    Query {
        /// Name of the function to query.
        function: String,
        /// Positional string arguments.
        args: Vec<String>,
    },
    /// An opaque blob the host serializes itself.
    Raw(Vec<u8>),
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A content-addressed transaction.
///
/// Constructed by the caller (usually via [`TransactionBuilder`]), immutable
/// once its seal has been computed and it has been placed into a block's
/// proof structure. The store persists it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Caller-assigned identifier, unique within a block and practically
    /// globally. Keys the transaction index.
    pub id: String,

    /// Host-application payload. Opaque to the engine.
    pub payload: TxPayload,

    /// Optional signature bytes. Carried opaquely — the engine neither
    /// produces nor verifies signatures.
    pub signature: Option<Vec<u8>>,

    /// Unix timestamp in milliseconds when the transaction was created.
    pub timestamp: u64,
}

impl Transaction {
    /// Compute this transaction's seal: the BLAKE3 digest of its canonical
    /// JSON serialization.
    ///
    /// Deterministic over all fields. Note that the signature, when present,
    /// participates in the seal — signing a transaction after its seal has
    /// been used in a proof structure would invalidate that proof, which is
    /// why transactions are immutable once batched.
    ///
    /// # Errors
    ///
    /// [`TxError::HashFailure`] if serialization fails.
    pub fn calculate_seal(&self) -> Result<[u8; 32], TxError> {
        let canonical = serde_json::to_vec(self)?;
        Ok(blake3_hash(&canonical))
    }

    /// Attach a signature. Must happen before the transaction enters a
    /// proof structure.
    pub fn set_signature(&mut self, signature: Vec<u8>) {
        self.signature = Some(signature);
    }

    /// Returns `true` if a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tx(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            payload: TxPayload::Invoke {
                function: "transfer".to_string(),
                args: vec!["alice".to_string(), "bob".to_string(), "10".to_string()],
            },
            signature: None,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn seal_is_deterministic() {
        let tx = make_tx("tx01");
        let a = tx.calculate_seal().unwrap();
        let b = tx.calculate_seal().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seal_changes_with_any_field() {
        let base = make_tx("tx01");
        let base_seal = base.calculate_seal().unwrap();

        let mut other_id = base.clone();
        other_id.id = "tx02".to_string();
        assert_ne!(other_id.calculate_seal().unwrap(), base_seal);

        let mut other_ts = base.clone();
        other_ts.timestamp += 1;
        assert_ne!(other_ts.calculate_seal().unwrap(), base_seal);

        let mut other_payload = base.clone();
        other_payload.payload = TxPayload::Raw(vec![1, 2, 3]);
        assert_ne!(other_payload.calculate_seal().unwrap(), base_seal);
    }

    #[test]
    fn signature_participates_in_seal() {
        let unsigned = make_tx("tx01");
        let mut signed = unsigned.clone();
        signed.set_signature(vec![0xAB; 64]);

        assert!(signed.is_signed());
        assert_ne!(
            unsigned.calculate_seal().unwrap(),
            signed.calculate_seal().unwrap()
        );
    }

    #[test]
    fn serialization_roundtrip() {
        let tx = make_tx("tx01");
        let json = serde_json::to_string(&tx).expect("serialize");
        let recovered: Transaction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(tx, recovered);
    }
}
