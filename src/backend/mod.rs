//! Backend capability traits - the consumed surface of the document store.
//!
//! The adapter speaks to the backend exclusively through [`Connection`], so
//! response-shape coupling to any particular client lives entirely inside a
//! backend implementation. [`Backend`] abstracts the connection/opening
//! process; the adapter calls it at most once per instance.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::BackendFault;
use crate::options::DabOptions;
use crate::params::SortSpec;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryBackend;

/// Connector for a document-store backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// The connection handle produced by this backend.
    type Conn: Connection;

    /// Open a connection bound to the index, kind, and protocol version in
    /// `options`. Called once per adapter instance; the handle is shared
    /// read-only across all subsequent operations.
    async fn connect(&self, options: &DabOptions) -> Result<Self::Conn, BackendFault>;
}

/// Operations a connected backend must support.
///
/// Faults use [`BackendFault`]; the adapter decides which of them get
/// normalized and which pass through to callers.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Filtered search returning matching hits in requested order.
    async fn search(&self, request: SearchRequest) -> Result<Vec<Hit>, BackendFault>;

    /// Fetch one document by id. `Missing` when there is none.
    async fn get(&self, id: &str) -> Result<Hit, BackendFault>;

    /// Create a document. `id` of `None` asks the backend to generate one;
    /// the assigned id is returned. `Conflict` when the id is taken.
    async fn create(
        &self,
        id: Option<&str>,
        source: Map<String, Value>,
        refresh: bool,
    ) -> Result<String, BackendFault>;

    /// Store `source` as the document at `id`, which must exist. The caller
    /// has already merged partial updates into the full document.
    async fn update(
        &self,
        id: &str,
        source: Map<String, Value>,
        refresh: bool,
    ) -> Result<(), BackendFault>;

    /// Store `source` as the document at `id`, creating or wholly replacing.
    async fn replace(
        &self,
        id: &str,
        source: Map<String, Value>,
        refresh: bool,
    ) -> Result<(), BackendFault>;

    /// Delete the document at `id`. `Missing` when there is none.
    async fn delete(&self, id: &str, refresh: bool) -> Result<(), BackendFault>;

    /// Batched existence lookup, one flag per id in input order. Used only
    /// for bulk diagnostics; results may be stale by write time.
    async fn multi_get(&self, ids: &[String]) -> Result<Vec<bool>, BackendFault>;

    /// Submit a batch of writes in one request. One outcome per action in
    /// input order; per-item failures are outcomes, not faults.
    async fn bulk(
        &self,
        actions: Vec<BulkAction>,
        refresh: bool,
    ) -> Result<Vec<BulkOutcome>, BackendFault>;
}

/// A search request built by the adapter.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Field -> value equality filters; empty object matches all.
    pub query: Value,
    /// Result offset.
    pub from: usize,
    /// Maximum results returned.
    pub size: usize,
    /// Sort keys applied before paging.
    pub sort: Vec<SortSpec>,
}

/// One document as returned by the backend: native id plus source fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: String,
    pub source: Map<String, Value>,
}

/// One write inside a bulk submission.
#[derive(Debug, Clone)]
pub enum BulkAction {
    /// Create; fails on an existing id.
    Create {
        id: String,
        source: Map<String, Value>,
    },
    /// Create-or-replace (the backend's index operation).
    Index {
        id: String,
        source: Map<String, Value>,
    },
    /// Delete by id.
    Delete { id: String },
}

impl BulkAction {
    /// Target id of this action.
    pub fn id(&self) -> &str {
        match self {
            BulkAction::Create { id, .. } => id,
            BulkAction::Index { id, .. } => id,
            BulkAction::Delete { id } => id,
        }
    }
}

/// Per-action result of a bulk submission.
///
/// `status` is the backend's own wording: `"created"`, `"updated"`,
/// `"deleted"`, `"document_already_exists"`, `"not_found"`, and whatever
/// else the backend reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub id: String,
    pub status: String,
}
