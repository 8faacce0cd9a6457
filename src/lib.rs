mod adapter;
mod backend;
mod crud;
mod document;
mod envelope;
mod error;
mod options;
mod params;

pub use adapter::DabAdapter;
pub use backend::{Backend, BulkAction, BulkOutcome, Connection, Hit, SearchRequest};
pub use crud::Crud;
pub use document::{documents_from_value, Document};
pub use envelope::{BulkItem, BulkResult, BulkStat, Updated};
pub use error::{BackendFault, DabError, DabResult};
pub use options::DabOptions;
pub use params::{FindParams, SortOrder, SortSpec, UpdateParams};

#[cfg(feature = "memory")]
pub use backend::MemoryBackend;
