#![allow(dead_code)]

use dab_rust::{Crud, DabAdapter, DabOptions, MemoryBackend};
use serde_json::{json, Value};

/// Two documents every suite starts from.
pub fn dummy_data() -> Vec<Value> {
    vec![
        json!({ "_id": "jack-bauer", "name": "Jack Bauer" }),
        json!({ "_id": "james-bond", "name": "James Bond" }),
    ]
}

/// Mixed bulk payload: one pre-existing id, one fresh id, one missing id.
pub fn bulk_docs() -> Value {
    json!([
        { "_id": "jack-bauer", "name": "Jack Bauer" },
        { "_id": "johnny-english", "name": "Johnny English" },
        { "name": "Jane Boo" }
    ])
}

/// Fresh adapter over an empty in-memory backend.
pub fn empty_adapter() -> DabAdapter<MemoryBackend> {
    DabAdapter::new(MemoryBackend::new())
}

/// Fresh adapter with explicit options.
pub fn adapter_with(options: DabOptions) -> DabAdapter<MemoryBackend> {
    DabAdapter::with_options(MemoryBackend::new(), options)
}

/// Adapter seeded with `dummy_data`.
pub async fn seeded_adapter() -> DabAdapter<MemoryBackend> {
    let adapter = empty_adapter();
    for doc in dummy_data() {
        adapter.create(doc).await.unwrap();
    }
    adapter
}
