//! In-memory backend, HashMap-backed. A development and test stand-in for a
//! real document store; not a storage engine.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Backend, BulkAction, BulkOutcome, Connection, Hit, SearchRequest};
use crate::error::BackendFault;
use crate::options::DabOptions;
use crate::params::{SortOrder, SortSpec};

/// One index worth of documents, insertion-ordered.
#[derive(Default)]
struct Index {
    docs: HashMap<String, Map<String, Value>>,
    order: Vec<String>,
}

impl Index {
    fn put(&mut self, id: &str, source: Map<String, Value>) -> bool {
        let existed = self.docs.insert(id.to_string(), source).is_some();
        if !existed {
            self.order.push(id.to_string());
        }
        existed
    }

    fn remove(&mut self, id: &str) -> bool {
        if self.docs.remove(id).is_some() {
            self.order.retain(|known| known != id);
            true
        } else {
            false
        }
    }
}

/// In-memory document store backed by a HashMap per index.
///
/// Clone-friendly via Arc: every connection handed out by [`Backend::connect`]
/// shares the same storage, so separate adapters over one `MemoryBackend`
/// observe each other's writes.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    indices: Arc<RwLock<HashMap<String, Index>>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    type Conn = MemoryConnection;

    async fn connect(&self, options: &DabOptions) -> Result<Self::Conn, BackendFault> {
        Ok(MemoryConnection {
            indices: Arc::clone(&self.indices),
            index: options.index.clone(),
        })
    }
}

/// Connection bound to one index of a [`MemoryBackend`].
pub struct MemoryConnection {
    indices: Arc<RwLock<HashMap<String, Index>>>,
    index: String,
}

impl MemoryConnection {
    fn read<T>(&self, f: impl FnOnce(Option<&Index>) -> T) -> Result<T, BackendFault> {
        let indices = self
            .indices
            .read()
            .map_err(|_| BackendFault::Unavailable("lock poisoned".to_string()))?;
        Ok(f(indices.get(&self.index)))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Index) -> T) -> Result<T, BackendFault> {
        let mut indices = self
            .indices
            .write()
            .map_err(|_| BackendFault::Unavailable("lock poisoned".to_string()))?;
        Ok(f(indices.entry(self.index.clone()).or_default()))
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn search(&self, request: SearchRequest) -> Result<Vec<Hit>, BackendFault> {
        let filters = match &request.query {
            Value::Object(fields) => fields.clone(),
            Value::Null => Map::new(),
            _ => {
                return Err(BackendFault::Rejected(
                    "query must be an object".to_string(),
                ))
            }
        };

        let mut hits = self.read(|index| {
            let Some(index) = index else {
                return Vec::new();
            };
            index
                .order
                .iter()
                .filter_map(|id| index.docs.get(id).map(|source| (id, source)))
                .filter(|(_, source)| matches_filters(source, &filters))
                .map(|(id, source)| Hit {
                    id: id.clone(),
                    source: source.clone(),
                })
                .collect::<Vec<_>>()
        })?;

        sort_hits(&mut hits, &request.sort);

        Ok(hits
            .into_iter()
            .skip(request.from)
            .take(request.size)
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Hit, BackendFault> {
        self.read(|index| {
            index
                .and_then(|index| index.docs.get(id))
                .map(|source| Hit {
                    id: id.to_string(),
                    source: source.clone(),
                })
                .ok_or(BackendFault::Missing)
        })?
    }

    async fn create(
        &self,
        id: Option<&str>,
        source: Map<String, Value>,
        _refresh: bool,
    ) -> Result<String, BackendFault> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.write(|index| {
            if index.docs.contains_key(&id) {
                return Err(BackendFault::Conflict);
            }
            index.put(&id, source);
            Ok(id.clone())
        })?
    }

    async fn update(
        &self,
        id: &str,
        source: Map<String, Value>,
        _refresh: bool,
    ) -> Result<(), BackendFault> {
        self.write(|index| {
            if !index.docs.contains_key(id) {
                return Err(BackendFault::Missing);
            }
            index.put(id, source);
            Ok(())
        })?
    }

    async fn replace(
        &self,
        id: &str,
        source: Map<String, Value>,
        _refresh: bool,
    ) -> Result<(), BackendFault> {
        self.write(|index| {
            index.put(id, source);
        })
    }

    async fn delete(&self, id: &str, _refresh: bool) -> Result<(), BackendFault> {
        self.write(|index| {
            if index.remove(id) {
                Ok(())
            } else {
                Err(BackendFault::Missing)
            }
        })?
    }

    async fn multi_get(&self, ids: &[String]) -> Result<Vec<bool>, BackendFault> {
        self.read(|index| {
            ids.iter()
                .map(|id| index.is_some_and(|index| index.docs.contains_key(id)))
                .collect()
        })
    }

    async fn bulk(
        &self,
        actions: Vec<BulkAction>,
        _refresh: bool,
    ) -> Result<Vec<BulkOutcome>, BackendFault> {
        self.write(|index| {
            actions
                .into_iter()
                .map(|action| {
                    let id = action.id().to_string();
                    let status = match action {
                        BulkAction::Create { id, source } => {
                            if index.docs.contains_key(&id) {
                                "document_already_exists"
                            } else {
                                index.put(&id, source);
                                "created"
                            }
                        }
                        BulkAction::Index { id, source } => {
                            if index.put(&id, source) {
                                "updated"
                            } else {
                                // An index op on a missing document creates
                                // it; the backend reports that, not success.
                                "created"
                            }
                        }
                        BulkAction::Delete { id } => {
                            if index.remove(&id) {
                                "deleted"
                            } else {
                                "not_found"
                            }
                        }
                    };
                    BulkOutcome {
                        id,
                        status: status.to_string(),
                    }
                })
                .collect()
        })
    }
}

fn matches_filters(source: &Map<String, Value>, filters: &Map<String, Value>) -> bool {
    filters
        .iter()
        .all(|(field, expected)| source.get(field) == Some(expected))
}

fn sort_hits(hits: &mut [Hit], sort: &[SortSpec]) {
    if sort.is_empty() {
        return;
    }
    hits.sort_by(|a, b| {
        for spec in sort {
            let ordering = compare_values(a.source.get(&spec.field), b.source.get(&spec.field));
            let ordering = match spec.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Total order over JSON values for sorting: absent < null < bool < number
/// < string < everything else by serialized form.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conn() -> MemoryConnection {
        MemoryConnection {
            indices: Arc::default(),
            index: "test".to_string(),
        }
    }

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let conn = conn();
        let id = conn
            .create(Some("jack-bauer"), source(json!({ "name": "Jack Bauer" })), true)
            .await
            .unwrap();
        assert_eq!(id, "jack-bauer");

        let hit = conn.get("jack-bauer").await.unwrap();
        assert_eq!(hit.source.get("name"), Some(&json!("Jack Bauer")));
    }

    #[tokio::test]
    async fn create_without_id_generates_one() {
        let conn = conn();
        let id = conn
            .create(None, source(json!({ "name": "Jane Boo" })), true)
            .await
            .unwrap();
        assert!(!id.is_empty());
        assert!(conn.get(&id).await.is_ok());
    }

    #[tokio::test]
    async fn create_conflict() {
        let conn = conn();
        conn.create(Some("a"), Map::new(), true).await.unwrap();
        assert_eq!(
            conn.create(Some("a"), Map::new(), true).await.unwrap_err(),
            BackendFault::Conflict
        );
    }

    #[tokio::test]
    async fn get_and_delete_missing() {
        let conn = conn();
        assert_eq!(conn.get("nope").await.unwrap_err(), BackendFault::Missing);
        assert_eq!(
            conn.delete("nope", true).await.unwrap_err(),
            BackendFault::Missing
        );
    }

    #[tokio::test]
    async fn search_preserves_insertion_order_and_pages() {
        let conn = conn();
        for (id, name) in [("a", "one"), ("b", "two"), ("c", "three")] {
            conn.create(Some(id), source(json!({ "name": name })), true)
                .await
                .unwrap();
        }

        let page = conn
            .search(SearchRequest {
                query: json!({}),
                from: 1,
                size: 1,
                sort: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "b");
    }

    #[tokio::test]
    async fn search_filters_and_sorts() {
        let conn = conn();
        for (id, name, rank) in [("a", "x", 3), ("b", "y", 1), ("c", "x", 2)] {
            conn.create(Some(id), source(json!({ "name": name, "rank": rank })), true)
                .await
                .unwrap();
        }

        let hits = conn
            .search(SearchRequest {
                query: json!({ "name": "x" }),
                from: 0,
                size: 10,
                sort: vec![SortSpec::desc("rank")],
            })
            .await
            .unwrap();
        assert_eq!(
            hits.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
    }

    #[tokio::test]
    async fn multi_get_flags_in_order() {
        let conn = conn();
        conn.create(Some("b"), Map::new(), true).await.unwrap();

        let flags = conn
            .multi_get(&["a".to_string(), "b".to_string(), "c".to_string()])
            .await
            .unwrap();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[tokio::test]
    async fn bulk_outcomes_per_action() {
        let conn = conn();
        conn.create(Some("taken"), Map::new(), true).await.unwrap();

        let outcomes = conn
            .bulk(
                vec![
                    BulkAction::Create {
                        id: "fresh".to_string(),
                        source: Map::new(),
                    },
                    BulkAction::Create {
                        id: "taken".to_string(),
                        source: Map::new(),
                    },
                    BulkAction::Index {
                        id: "taken".to_string(),
                        source: Map::new(),
                    },
                    BulkAction::Index {
                        id: "absent".to_string(),
                        source: Map::new(),
                    },
                    BulkAction::Delete {
                        id: "fresh".to_string(),
                    },
                    BulkAction::Delete {
                        id: "gone".to_string(),
                    },
                ],
                true,
            )
            .await
            .unwrap();

        let statuses: Vec<&str> = outcomes.iter().map(|o| o.status.as_str()).collect();
        assert_eq!(
            statuses,
            vec![
                "created",
                "document_already_exists",
                "updated",
                "created",
                "deleted",
                "not_found"
            ]
        );
    }

    #[tokio::test]
    async fn connections_share_storage() {
        let backend = MemoryBackend::new();
        let options = DabOptions::default();
        let a = backend.connect(&options).await.unwrap();
        let b = backend.connect(&options).await.unwrap();

        a.create(Some("shared"), Map::new(), true).await.unwrap();
        assert!(b.get("shared").await.is_ok());
    }
}
