//! Location store
//!
//! `LocationStore` is the seam between the handlers and persistence. The
//! document-store backend is what runs in production; the in-memory backend
//! keeps the same ordering rules for local runs and tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use liveshare_docstore::{Collection, DocStoreError, DocStorePool, FindOptions, PoolConfig};
use parking_lot::RwLock;
use tracing::{error, info};

use crate::model::{LocationDocument, LocationRecord, TIMESTAMP_FIELD};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store: {0}")]
    Backend(#[from] DocStoreError),

    #[error("malformed location document {id}: {reason}")]
    Decode { id: String, reason: String },

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("store closed")]
    Closed,
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Backend name for logs and readiness output
    fn backend(&self) -> &'static str;

    async fn insert(&self, record: &LocationRecord) -> StoreResult<()>;

    /// Newest first, at most `limit` records
    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<LocationRecord>>;

    /// Remove every record; returns how many were removed
    async fn clear(&self) -> StoreResult<u64>;

    async fn is_healthy(&self) -> bool;

    /// Release backend resources. Called once at shutdown.
    fn close(&self);
}

fn decode(doc: LocationDocument) -> StoreResult<LocationRecord> {
    let id = doc.id.clone();
    LocationRecord::try_from(doc).map_err(|e| {
        error!(id = %id, error = %e, "Stored location has an unreadable timestamp");
        StoreError::Decode {
            id,
            reason: e.to_string(),
        }
    })
}

/// Store backed by a document collection
pub struct DocumentLocationStore {
    pool: DocStorePool,
    collection: Collection,
}

impl DocumentLocationStore {
    /// Open the pool and make sure the collection and its timestamp index exist
    pub async fn connect(config: PoolConfig, collection: &str) -> StoreResult<Self> {
        let pool = DocStorePool::new(config).await?;
        let collection = pool.collection(collection)?;
        collection.ensure().await?;
        collection.ensure_index(TIMESTAMP_FIELD).await?;

        info!(collection = collection.name(), "Location collection ready");

        Ok(Self { pool, collection })
    }
}

#[async_trait]
impl LocationStore for DocumentLocationStore {
    fn backend(&self) -> &'static str {
        "docstore"
    }

    async fn insert(&self, record: &LocationRecord) -> StoreResult<()> {
        let doc = LocationDocument::from(record);
        self.collection.insert_one(&doc.id, &doc).await?;
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<LocationRecord>> {
        let options = FindOptions::new()
            .sort_desc(TIMESTAMP_FIELD)
            .limit(limit as i64);
        let docs: Vec<LocationDocument> = self.collection.find(&options).await?;
        docs.into_iter().map(decode).collect()
    }

    async fn clear(&self) -> StoreResult<u64> {
        Ok(self.collection.delete_many().await?)
    }

    async fn is_healthy(&self) -> bool {
        self.pool.is_healthy().await
    }

    fn close(&self) {
        self.pool.close();
    }
}

/// Process-local store, lost on restart
#[derive(Default)]
pub struct InMemoryLocationStore {
    docs: RwLock<Vec<LocationDocument>>,
    closed: AtomicBool,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.read().iter().any(|d| d.id == id)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: &LocationRecord) -> StoreResult<()> {
        self.check_open()?;
        self.docs.write().push(LocationDocument::from(record));
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<LocationRecord>> {
        self.check_open()?;
        // Newest insert first so equal timestamps keep reverse insertion order
        let mut docs: Vec<LocationDocument> = self.docs.read().iter().rev().cloned().collect();
        docs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        docs.truncate(limit);
        docs.into_iter().map(decode).collect()
    }

    async fn clear(&self) -> StoreResult<u64> {
        self.check_open()?;
        let mut docs = self.docs.write();
        let deleted = docs.len() as u64;
        docs.clear();
        Ok(deleted)
    }

    async fn is_healthy(&self) -> bool {
        !self.is_closed()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
