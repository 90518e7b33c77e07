//! The request store collaborator.
//!
//! The store exclusively owns the canonical records. The engine reads copies,
//! computes the next revision and hands it back through [`RequestStore::save`],
//! which refuses anything but the immediate successor of the stored revision.

use crate::error::StoreError;
use crate::types::{Request, RequestId, RequestStatus, newest_first};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence boundary for requests.
///
/// Implementations may suspend (network, disk); callers treat every method as
/// a potential await point.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// List requests, optionally restricted to one status.
    ///
    /// Results are ordered most recently created first, ties by id ascending.
    ///
    /// # Errors
    ///
    /// Backend failures only; an empty result is not an error.
    async fn list(&self, status: Option<RequestStatus>) -> StoreResult<Vec<Request>>;

    /// Fetch one request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    async fn get(&self, id: RequestId) -> StoreResult<Request>;

    /// Add a request produced by intake.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the id is already taken.
    async fn insert(&self, request: Request) -> StoreResult<()>;

    /// Replace a request with its next revision.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown and
    /// [`StoreError::Conflict`] if `request.version` is not exactly one past
    /// the stored version.
    async fn save(&self, request: Request) -> StoreResult<()>;
}

/// In-memory request store for tests and demos
#[derive(Clone, Debug, Default)]
pub struct InMemoryRequestStore {
    records: Arc<RwLock<HashMap<RequestId, Request>>>,
}

impl InMemoryRequestStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `requests`, bypassing intake.
    ///
    /// Later duplicates replace earlier ones.
    #[must_use]
    pub fn with_requests(requests: impl IntoIterator<Item = Request>) -> Self {
        let records = requests.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of stored requests
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no requests
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn list(&self, status: Option<RequestStatus>) -> StoreResult<Vec<Request>> {
        let records = self.records.read().await;
        let mut listed: Vec<Request> = records
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        listed.sort_by(newest_first);
        Ok(listed)
    }

    async fn get(&self, id: RequestId) -> StoreResult<Request> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, request: Request) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&request.id) {
            return Err(StoreError::Duplicate(request.id));
        }
        records.insert(request.id, request);
        Ok(())
    }

    async fn save(&self, request: Request) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(&request.id)
            .ok_or(StoreError::NotFound(request.id))?;

        if stored.version + 1 != request.version {
            return Err(StoreError::Conflict {
                id: request.id,
                stored: stored.version,
                incoming: request.version,
            });
        }

        *stored = request;
        Ok(())
    }
}
