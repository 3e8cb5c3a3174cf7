//! # Hashing Utilities
//!
//! BLAKE3 is the single hash function of the engine — transaction seals,
//! Merkle nodes, and block seals all come from the same 32-byte digest.
//! It is fast on every platform that matters and resistant to length
//! extension by construction, so no double-hashing tricks are needed.

/// Compute the BLAKE3 hash of the input data.
///
/// Returns a 32-byte digest as a fixed-size array. This is the workhorse
/// of the engine; every seal in the system bottoms out in this call.
///
/// # Example
///
/// ```
/// use strata_ledger::crypto::blake3_hash;
///
/// let digest = blake3_hash(b"strata ledger");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Hash multiple byte slices together without concatenation overhead.
///
/// Feeds the parts sequentially into one hasher instead of allocating a
/// combined buffer. The result equals hashing the concatenation, and the
/// order of parts is significant — `multi(&[a, b]) != multi(&[b, a])`.
///
/// This is the pairing primitive for intermediate Merkle nodes:
/// `parent = blake3_hash_multi(&[left, right])`.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake3_deterministic() {
        let a = blake3_hash(b"strata");
        let b = blake3_hash(b"strata");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn blake3_different_inputs() {
        let a = blake3_hash(b"strata");
        let b = blake3_hash(b"Strata"); // case sensitive!
        assert_ne!(a, b);
    }

    #[test]
    fn multi_matches_concatenation() {
        // Hashing parts via update() must equal hashing them concatenated.
        let multi = blake3_hash_multi(&[b"hello", b" world"]);
        let single = blake3_hash(b"hello world");
        assert_eq!(multi, single);
    }

    #[test]
    fn multi_is_order_sensitive() {
        let left = blake3_hash(b"left");
        let right = blake3_hash(b"right");
        let ab = blake3_hash_multi(&[&left, &right]);
        let ba = blake3_hash_multi(&[&right, &left]);
        assert_ne!(ab, ba);
    }
}
