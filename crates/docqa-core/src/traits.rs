use crate::types::{Snapshot, SourceFile};

/// Decodes an uploaded file into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, file: &SourceFile) -> anyhow::Result<String>;
}

/// Persists index state between runs.
///
/// `load` returns `Ok(None)` when nothing has been saved yet.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<Snapshot>>;
    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
    fn remove(&self) -> anyhow::Result<()>;
    fn exists(&self) -> bool;
}
