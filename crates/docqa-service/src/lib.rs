//! docqa-service
//!
//! The question-answering service facade: stages documents, publishes
//! immutable indexes by atomic swap, validates ingest batches and keeps an
//! optional JSON snapshot in sync.

pub mod service;
pub mod snapshot;

pub use service::DocumentService;
pub use snapshot::JsonFileStore;
