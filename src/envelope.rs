//! Result envelope types returned by adapter operations.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Outcome of `update`: the canonical stored form after the write, plus the
/// pre-update snapshot when the caller asked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Updated {
    pub data: Document,
    pub source: Option<Document>,
}

/// Aggregate counts for a bulk operation. `ok + fail == total`, and `total`
/// equals the input length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkStat {
    pub ok: usize,
    pub fail: usize,
    pub total: usize,
}

/// Per-item outcome of a bulk operation, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItem {
    pub id: String,
    pub ok: bool,
    /// Failure reason: `"Exists"`, `"Not found"`, or the backend-reported
    /// status capitalized. `None` on success.
    pub message: Option<String>,
}

/// Outcome of a bulk operation. The operation as a whole succeeds even when
/// some items failed; per-item outcomes live in `detail` when requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub stat: BulkStat,
    pub detail: Option<Vec<BulkItem>>,
}
