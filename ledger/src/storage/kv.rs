//! Key-value backend boundary.
//!
//! The store talks to its backend through [`KvBackend`]: atomic single-key
//! put/get/delete plus a batched write. Two implementations ship with the
//! engine — [`SledBackend`] for durable embedded storage and
//! [`MemoryBackend`] for tests and ephemeral use. Anything that satisfies
//! the trait (RocksDB, a remote KV, a fake injecting faults) plugs in the
//! same way.
//!
//! Logical tables share one physical keyspace: every raw key is prefixed
//! with `"<table>_"` via [`table_key`].

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::RwLock;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors surfaced by a storage backend, passed through unmodified.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// sled error.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
}

// ---------------------------------------------------------------------------
// Key Namespacing
// ---------------------------------------------------------------------------

/// Build the physical key for a logical `(table, key)` pair: `"<table>_" + key`.
pub fn table_key(table: &str, key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(table.len() + 1 + key.len());
    out.extend_from_slice(table.as_bytes());
    out.push(b'_');
    out.extend_from_slice(key);
    out
}

// ---------------------------------------------------------------------------
// WriteBatch
// ---------------------------------------------------------------------------

/// A set of puts applied as one unit.
///
/// Backends that support atomic batches apply it all-or-nothing; per-key
/// backends apply entries in insertion order, which is why the store puts
/// the seal-index entry first.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put of a namespaced key.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.push((key, value));
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[(Vec<u8>, Vec<u8>)] {
        &self.entries
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// KvBackend
// ---------------------------------------------------------------------------

/// Contract the block store requires of its storage backend.
///
/// `durable: true` asks the backend to make the write crash-safe before
/// returning; backends without that distinction may treat it as a no-op.
pub trait KvBackend: Send + Sync {
    /// Fetch a value. `Ok(None)` is the backend's not-found condition.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, BackendError>;

    /// Write a single key.
    fn put(&self, key: &[u8], value: &[u8], durable: bool) -> Result<(), BackendError>;

    /// Delete a single key. Deleting an absent key is not an error.
    fn delete(&self, key: &[u8], durable: bool) -> Result<(), BackendError>;

    /// Apply a batch of writes, atomically where the backend supports it.
    fn batch_write(&self, batch: WriteBatch, durable: bool) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// SledBackend
// ---------------------------------------------------------------------------

/// Durable embedded backend over sled.
///
/// sled supports lock-free concurrent reads and serialized writes, so the
/// backend can be shared across threads without external locking. Batches
/// are applied through `sled::Batch`, which is atomic.
#[derive(Debug, Clone)]
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    /// Open or create a database at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    /// Create a temporary database cleaned up on drop. Ideal for tests —
    /// no filesystem side effects to clean up.
    pub fn open_temporary() -> Result<Self, BackendError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Block until all pending writes are durable.
    pub fn flush(&self) -> Result<(), BackendError> {
        self.db.flush()?;
        Ok(())
    }
}

impl KvBackend for SledBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.db.get(key)?.map(|ivec| ivec.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8], durable: bool) -> Result<(), BackendError> {
        self.db.insert(key, value)?;
        if durable {
            self.db.flush()?;
        }
        Ok(())
    }

    fn delete(&self, key: &[u8], durable: bool) -> Result<(), BackendError> {
        self.db.remove(key)?;
        if durable {
            self.db.flush()?;
        }
        Ok(())
    }

    fn batch_write(&self, batch: WriteBatch, durable: bool) -> Result<(), BackendError> {
        let mut sled_batch = sled::Batch::default();
        for (key, value) in batch.entries() {
            sled_batch.insert(key.as_slice(), value.as_slice());
        }
        self.db.apply_batch(sled_batch)?;
        if durable {
            self.db.flush()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryBackend
// ---------------------------------------------------------------------------

/// In-memory backend over a `BTreeMap`.
///
/// For unit tests and ephemeral stores. The `durable` flag is accepted and
/// ignored — there is nothing to persist to.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// `true` when the backend holds no keys.
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.map.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8], _durable: bool) -> Result<(), BackendError> {
        self.map.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8], _durable: bool) -> Result<(), BackendError> {
        self.map.write().remove(key);
        Ok(())
    }

    fn batch_write(&self, batch: WriteBatch, _durable: bool) -> Result<(), BackendError> {
        let mut map = self.map.write();
        for (key, value) in batch.entries() {
            map.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
