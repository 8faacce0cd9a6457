//! The uniform CRUD contract produced for callers.

use async_trait::async_trait;
use serde_json::Value;

use crate::document::Document;
use crate::envelope::{BulkResult, Updated};
use crate::error::DabResult;
use crate::params::{FindParams, UpdateParams};

/// Uniform CRUD contract over a document store.
///
/// One implementation per backend; callers program against this trait and
/// swap backends without changing call sites. Bodies cross the seam as raw
/// JSON values and are shape-checked before any backend call.
#[async_trait]
pub trait Crud {
    /// Filtered, paged, sorted search. Every returned document carries its
    /// id under the configured public id field.
    async fn find(&self, params: FindParams) -> DabResult<Vec<Document>>;

    /// Fetch a single document by id. `NotFound` when there is none.
    async fn find_one(&self, id: &str) -> DabResult<Document>;

    /// Create a document. A client-supplied id is honored verbatim and
    /// checked for existence first (`Exists`); otherwise the backend
    /// generates one. Returns the canonical stored form.
    async fn create(&self, body: Value) -> DabResult<Document>;

    /// Update the document at `id` (`NotFound` when absent): merge field by
    /// field, or replace wholly when `params.full_replace`. Returns the
    /// canonical updated form, plus the prior snapshot when
    /// `params.with_source`.
    async fn update(&self, id: &str, body: Value, params: UpdateParams) -> DabResult<Updated>;

    /// Delete the document at `id` (`NotFound` when absent). Returns the
    /// prior snapshot when `with_source`.
    async fn remove(&self, id: &str, with_source: bool) -> DabResult<Option<Document>>;

    /// Bulk create. Documents missing an id get a generated one. Never
    /// aborts on partial failure; per-item outcomes are returned in input
    /// order when `with_detail`.
    async fn bulk_create(&self, body: Value, with_detail: bool) -> DabResult<BulkResult>;

    /// Bulk full-replace, same envelope as `bulk_create`.
    async fn bulk_update(&self, body: Value, with_detail: bool) -> DabResult<BulkResult>;

    /// Bulk delete by an array of id strings, same envelope as
    /// `bulk_create`.
    async fn bulk_remove(&self, ids: Value, with_detail: bool) -> DabResult<BulkResult>;
}
