//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] enforces a disciplined construction flow: set
//! the fields, call `.build()`, and get back an unsigned [`Transaction`].
//! The builder does not sign — signatures are attached by the host via
//! [`Transaction::set_signature`] before the transaction enters a batch.

use chrono::Utc;

use super::{Transaction, TxPayload};

/// Fluent builder for [`Transaction`].
///
/// The timestamp defaults to "now" (unix millis) and can be pinned
/// explicitly for reproducible tests.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    id: String,
    payload: TxPayload,
    timestamp: Option<u64>,
}

impl TransactionBuilder {
    /// Start a builder for a transaction with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: TxPayload::Raw(Vec::new()),
            timestamp: None,
        }
    }

    /// Set an invoke payload: a state-changing call.
    pub fn invoke(mut self, function: impl Into<String>, args: Vec<String>) -> Self {
        self.payload = TxPayload::Invoke {
            function: function.into(),
            args,
        };
        self
    }

    /// Set a query payload: a read-only call.
    pub fn query(mut self, function: impl Into<String>, args: Vec<String>) -> Self {
        self.payload = TxPayload::Query {
            function: function.into(),
            args,
        };
        self
    }

    /// Set an opaque raw payload.
    pub fn raw_payload(mut self, bytes: Vec<u8>) -> Self {
        self.payload = TxPayload::Raw(bytes);
        self
    }

    /// Pin the creation timestamp (unix millis). When omitted, `build()`
    /// stamps the current time.
    pub fn timestamp(mut self, millis: u64) -> Self {
        self.timestamp = Some(millis);
        self
    }

    /// Finalize into an unsigned [`Transaction`].
    pub fn build(self) -> Transaction {
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis() as u64);

        Transaction {
            id: self.id,
            payload: self.payload,
            signature: None,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_pinned_timestamp() {
        let tx = TransactionBuilder::new("tx01")
            .invoke("transfer", vec!["alice".into(), "bob".into()])
            .timestamp(1_000_000)
            .build();

        assert_eq!(tx.id, "tx01");
        assert_eq!(tx.timestamp, 1_000_000);
        assert!(!tx.is_signed());
        match tx.payload {
            TxPayload::Invoke { ref function, ref args } => {
                assert_eq!(function, "transfer");
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected invoke payload"),
        }
    }

    #[test]
    fn defaults_timestamp_to_now() {
        let before = Utc::now().timestamp_millis() as u64;
        let tx = TransactionBuilder::new("tx02").build();
        let after = Utc::now().timestamp_millis() as u64;
        assert!(tx.timestamp >= before && tx.timestamp <= after);
    }

    #[test]
    fn pinned_builds_are_content_identical() {
        let a = TransactionBuilder::new("tx03")
            .query("balance", vec!["alice".into()])
            .timestamp(42)
            .build();
        let b = TransactionBuilder::new("tx03")
            .query("balance", vec!["alice".into()])
            .timestamp(42)
            .build();
        assert_eq!(a, b);
        assert_eq!(
            a.calculate_seal().unwrap(),
            b.calculate_seal().unwrap()
        );
    }
}
