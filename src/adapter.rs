//! DabAdapter - translates the uniform CRUD contract into backend calls and
//! normalizes responses and faults into the result envelope.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::backend::{Backend, BulkAction, BulkOutcome, Connection, Hit, SearchRequest};
use crate::crud::Crud;
use crate::document::{documents_from_value, Document};
use crate::envelope::{BulkItem, BulkResult, BulkStat, Updated};
use crate::error::{BackendFault, DabError, DabResult};
use crate::options::DabOptions;
use crate::params::{FindParams, UpdateParams};

/// CRUD adapter over one document-store backend.
///
/// Stateless beyond the connection handle, which is created at most once on
/// first use and shared read-only across operations. There is no retry,
/// idempotence, or transactional coordination: a concurrent writer can slip
/// between the fetch and the write of `update`/`remove`, and the backend
/// owns per-document consistency.
pub struct DabAdapter<B: Backend> {
    backend: B,
    options: DabOptions,
    conn: OnceCell<B::Conn>,
}

impl<B: Backend> DabAdapter<B> {
    /// Create an adapter with default options.
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, DabOptions::default())
    }

    /// Create an adapter with explicit options.
    pub fn with_options(backend: B, options: DabOptions) -> Self {
        DabAdapter {
            backend,
            options,
            conn: OnceCell::new(),
        }
    }

    /// The configuration this adapter was built with.
    pub fn options(&self) -> &DabOptions {
        &self.options
    }

    /// Connect-or-reuse accessor for the backend connection.
    async fn conn(&self) -> DabResult<&B::Conn> {
        self.conn
            .get_or_try_init(|| async {
                debug!(index = %self.options.index, "connecting to backend");
                self.backend.connect(&self.options).await
            })
            .await
            .map_err(DabError::from)
    }

    /// Validate an incoming body and rewrite the public id field to the
    /// backend-native one.
    fn sanitize(&self, body: Value) -> DabResult<Document> {
        let mut doc = Document::try_from(body)?;
        doc.alias_id(self.options.id_dest(), &self.options.id_source);
        Ok(doc)
    }

    /// Validate an incoming array body and sanitize every element.
    fn sanitize_many(&self, body: Value) -> DabResult<Vec<Document>> {
        let mut docs = documents_from_value(body)?;
        for doc in &mut docs {
            doc.alias_id(self.options.id_dest(), &self.options.id_source);
        }
        Ok(docs)
    }

    /// Translate a backend hit into an outgoing document, annotated with its
    /// id under the public id field.
    fn convert(&self, hit: Hit) -> Document {
        doc_from_hit(hit, self.options.id_dest())
    }

    /// Multi-get pre-check, bulk submission, and per-item reconciliation
    /// shared by the three bulk operations.
    async fn run_bulk(
        &self,
        kind: BulkKind,
        actions: Vec<BulkAction>,
        with_detail: bool,
    ) -> DabResult<BulkResult> {
        let conn = self.conn().await?;
        let ids: Vec<String> = actions
            .iter()
            .map(|action| action.id().to_string())
            .collect();

        // Existence flags feed diagnostic text only; they never gate the
        // write and may be stale by the time the bulk lands.
        let found = conn.multi_get(&ids).await?;
        let outcomes = conn.bulk(actions, self.options.refresh).await?;

        let result = reconcile(kind, outcomes, &found, with_detail);
        debug!(
            ok = result.stat.ok,
            fail = result.stat.fail,
            total = result.stat.total,
            "bulk {} reconciled",
            kind.name()
        );
        Ok(result)
    }
}

#[async_trait]
impl<B: Backend> Crud for DabAdapter<B> {
    async fn find(&self, params: FindParams) -> DabResult<Vec<Document>> {
        let conn = self.conn().await?;
        let limit = params.limit.unwrap_or(self.options.limit);
        let from = (params.page.unwrap_or(1).max(1) - 1) * limit;

        let hits = conn
            .search(SearchRequest {
                query: params.query,
                from,
                size: limit,
                sort: params.sort,
            })
            .await?;

        Ok(hits.into_iter().map(|hit| self.convert(hit)).collect())
    }

    async fn find_one(&self, id: &str) -> DabResult<Document> {
        let conn = self.conn().await?;
        let hit = conn.get(id).await.map_err(read_error)?;
        Ok(self.convert(hit))
    }

    async fn create(&self, body: Value) -> DabResult<Document> {
        let mut doc = self.sanitize(body)?;
        let conn = self.conn().await?;

        let supplied = doc.take_id(&self.options.id_source);
        if let Some(id) = &supplied {
            match conn.get(id).await {
                Ok(_) => return Err(DabError::Exists),
                Err(BackendFault::Missing) => {}
                Err(fault) => return Err(fault.into()),
            }
        }

        let id = conn
            .create(supplied.as_deref(), doc.into_map(), self.options.refresh)
            .await?;
        debug!(%id, "created document");

        // Re-fetch so the caller gets the canonical stored form.
        let hit = conn.get(&id).await.map_err(read_error)?;
        Ok(self.convert(hit))
    }

    async fn update(&self, id: &str, body: Value, params: UpdateParams) -> DabResult<Updated> {
        let mut body = self.sanitize(body)?;
        // Ids are immutable once assigned; a body id is dropped, not applied.
        body.take_id(&self.options.id_source);

        let conn = self.conn().await?;
        let existing = conn.get(id).await.map_err(read_error)?;
        let snapshot = self.convert(existing.clone());

        if params.full_replace {
            conn.replace(id, body.into_map(), self.options.refresh)
                .await?;
        } else {
            let mut merged = Document::from_map(existing.source);
            merged.merge(body);
            conn.update(id, merged.into_map(), self.options.refresh)
                .await?;
        }
        debug!(%id, full_replace = params.full_replace, "updated document");

        let hit = conn.get(id).await.map_err(read_error)?;
        Ok(Updated {
            data: self.convert(hit),
            source: params.with_source.then_some(snapshot),
        })
    }

    async fn remove(&self, id: &str, with_source: bool) -> DabResult<Option<Document>> {
        let conn = self.conn().await?;
        let existing = conn.get(id).await.map_err(read_error)?;
        let snapshot = self.convert(existing);

        conn.delete(id, self.options.refresh).await?;
        debug!(%id, "removed document");

        Ok(with_source.then_some(snapshot))
    }

    async fn bulk_create(&self, body: Value, with_detail: bool) -> DabResult<BulkResult> {
        let docs = self.sanitize_many(body)?;
        let actions = docs
            .into_iter()
            .map(|mut doc| {
                let id = doc
                    .take_id(&self.options.id_source)
                    .unwrap_or_else(generated_id);
                BulkAction::Create {
                    id,
                    source: doc.into_map(),
                }
            })
            .collect();
        self.run_bulk(BulkKind::Create, actions, with_detail).await
    }

    async fn bulk_update(&self, body: Value, with_detail: bool) -> DabResult<BulkResult> {
        let docs = self.sanitize_many(body)?;
        let actions = docs
            .into_iter()
            .map(|mut doc| {
                // A generated id for a missing one comes back not-found.
                let id = doc
                    .take_id(&self.options.id_source)
                    .unwrap_or_else(generated_id);
                BulkAction::Index {
                    id,
                    source: doc.into_map(),
                }
            })
            .collect();
        self.run_bulk(BulkKind::Update, actions, with_detail).await
    }

    async fn bulk_remove(&self, ids: Value, with_detail: bool) -> DabResult<BulkResult> {
        let Value::Array(items) = ids else {
            return Err(DabError::InvalidInput("Require array"));
        };
        let actions = items
            .into_iter()
            .map(|item| match item {
                Value::String(id) => Ok(BulkAction::Delete { id }),
                _ => Err(DabError::InvalidInput("Require array of id strings")),
            })
            .collect::<DabResult<Vec<_>>>()?;
        self.run_bulk(BulkKind::Remove, actions, with_detail).await
    }
}

/// Which bulk operation is being reconciled.
#[derive(Debug, Clone, Copy)]
enum BulkKind {
    Create,
    Update,
    Remove,
}

impl BulkKind {
    fn name(self) -> &'static str {
        match self {
            BulkKind::Create => "create",
            BulkKind::Update => "update",
            BulkKind::Remove => "remove",
        }
    }

    /// Backend status string that counts as success.
    fn ok_status(self) -> &'static str {
        match self {
            BulkKind::Create => "created",
            BulkKind::Update => "updated",
            BulkKind::Remove => "deleted",
        }
    }

    /// Failure reason for one item, given whether the pre-check found its id
    /// and what the backend reported.
    fn reason(self, pre_existing: bool, status: &str) -> String {
        match self {
            BulkKind::Create if pre_existing => "Exists".to_string(),
            BulkKind::Update | BulkKind::Remove if !pre_existing => "Not found".to_string(),
            _ => upper_first(status),
        }
    }
}

/// Reconcile bulk outcomes against the pre-check flags, in input order.
fn reconcile(
    kind: BulkKind,
    outcomes: Vec<BulkOutcome>,
    found: &[bool],
    with_detail: bool,
) -> BulkResult {
    let total = outcomes.len();
    let mut ok = 0;
    let mut detail = Vec::with_capacity(total);

    for (i, outcome) in outcomes.into_iter().enumerate() {
        if outcome.status == kind.ok_status() {
            ok += 1;
            detail.push(BulkItem {
                id: outcome.id,
                ok: true,
                message: None,
            });
        } else {
            let pre_existing = found.get(i).copied().unwrap_or(false);
            detail.push(BulkItem {
                id: outcome.id,
                ok: false,
                message: Some(kind.reason(pre_existing, &outcome.status)),
            });
        }
    }

    BulkResult {
        stat: BulkStat {
            ok,
            fail: total - ok,
            total,
        },
        detail: with_detail.then_some(detail),
    }
}

/// Translate a backend hit into a document annotated with its id.
fn doc_from_hit(hit: Hit, id_field: &str) -> Document {
    let mut doc = Document::from_map(hit.source);
    doc.insert(id_field, Value::String(hit.id));
    doc
}

/// A fresh server-side id for documents that arrived without one.
fn generated_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Fault mapping for read paths: a missing document is `NotFound`, anything
/// else passes through.
fn read_error(fault: BackendFault) -> DabError {
    match fault {
        BackendFault::Missing => DabError::NotFound,
        other => DabError::Backend(other),
    }
}

fn upper_first(status: &str) -> String {
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
