//! Per-operation parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for `find`.
///
/// `query` is an object of field -> value equality filters; an empty object
/// (the default) matches everything. Paging is 1-based: the offset sent to
/// the backend is `(page - 1) * limit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindParams {
    pub query: Value,
    pub limit: Option<usize>,
    pub page: Option<usize>,
    pub sort: Vec<SortSpec>,
}

/// One sort key for `find` results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parameters for `update`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateParams {
    /// Replace the stored document wholly instead of merging field by field.
    pub full_replace: bool,
    /// Also return the pre-update snapshot.
    pub with_source: bool,
}
