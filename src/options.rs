//! Adapter configuration, set once at construction.

use serde::{Deserialize, Serialize};

/// Immutable adapter configuration.
///
/// Built before the adapter and never mutated by operations; the lazily
/// created connection handle snapshots it on first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DabOptions {
    /// Backend host endpoints.
    pub hosts: Vec<String>,
    /// Index (collection) name all operations are bound to.
    pub index: String,
    /// Document type/category name within the index.
    pub kind: String,
    /// Backend protocol version, when the client needs one pinned.
    pub api_version: Option<String>,
    /// Default page size for `find` when the caller gives none.
    pub limit: usize,
    /// Field name the backend stores ids under.
    pub id_source: String,
    /// Public alias for the id field. `None` means no aliasing: callers see
    /// `id_source` verbatim.
    pub id_dest: Option<String>,
    /// Whether writes ask the backend to refresh before acknowledging, so
    /// subsequent reads observe them.
    pub refresh: bool,
}

impl Default for DabOptions {
    fn default() -> Self {
        DabOptions {
            hosts: vec!["localhost:9200".to_string()],
            index: "test".to_string(),
            kind: "doc".to_string(),
            api_version: None,
            limit: 25,
            id_source: "_id".to_string(),
            id_dest: None,
            refresh: true,
        }
    }
}

impl DabOptions {
    /// The field name callers address ids by.
    pub fn id_dest(&self) -> &str {
        self.id_dest.as_deref().unwrap_or(&self.id_source)
    }
}
