//! Domain types shared by the text pipeline, the service and its callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw bytes of an uploaded or on-disk file, before text extraction.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Lowercased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

/// A named document holding its normalized full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub name: String,
    pub text: String,
}

/// A chunk of a source document that is independently indexed.
///
/// - `text`: the chunk payload, an excerpt of the normalized document text
/// - `document_name`: name of the document the chunk was cut from
/// - `tokens`: the tokenized form used by the lexical index
///
/// Text, origin and tokens travel together so they can never fall out of step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub document_name: String,
    pub tokens: Vec<String>,
}

/// A retrieved chunk. `relevance_score` is the raw lexical score divided by
/// a fixed constant; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    pub document_name: String,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    pub document_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Result of a search request. "No index" and "no match" are distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NotIndexed,
    NoMatch,
    Hits(Vec<SearchHit>),
}

impl SearchOutcome {
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        if hits.is_empty() { Self::NoMatch } else { Self::Hits(hits) }
    }

    /// Hits as a slice; empty for both `NotIndexed` and `NoMatch`.
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Hits(hits) => hits,
            Self::NotIndexed | Self::NoMatch => &[],
        }
    }
}

/// Result of a question. `NotFound` carries the caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    NotIndexed,
    NotFound(String),
    Answered(Answer),
}

/// Persisted state of the index: documents plus their chunks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub documents: Vec<SourceDocument>,
    #[serde(default)]
    pub chunks: Vec<DocumentChunk>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(documents: Vec<SourceDocument>, chunks: Vec<DocumentChunk>) -> Self {
        Self { documents, chunks, saved_at: Some(Utc::now()) }
    }
}

/// What happened to the snapshot after a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Saved,
    Failed(String),
    Disabled,
}

/// What happened to the snapshot when the service was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SnapshotLoad {
    /// Rehydrated from the snapshot.
    Loaded { documents: usize, chunks: usize },
    /// Nothing saved yet, or a snapshot without chunks.
    Missing,
    /// The snapshot could not be read or parsed and was ignored.
    Discarded { reason: String },
    /// No snapshot store configured.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub documents: usize,
    pub chunks: usize,
    pub persistence: Persistence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub message: String,
    pub files_processed: usize,
    pub files_list: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub documents_count: usize,
    pub chunks_count: usize,
    pub has_index: bool,
    pub snapshot_exists: bool,
    pub snapshot_load: SnapshotLoad,
    pub document_names: Vec<String>,
}
