use anyhow::{anyhow, bail};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info, warn};

use docqa_core::config::Settings;
use docqa_core::data_processor::PlainTextExtractor;
use docqa_core::error::{Error, Result};
use docqa_core::traits::{SnapshotStore, TextExtractor};
use docqa_core::types::{
    AnswerOutcome, BuildSummary, IndexInfo, IngestReport, Persistence, SearchOutcome, Snapshot, SnapshotLoad,
    SourceFile,
};
use docqa_text::{answer_question, search, AnswerOptions, Bm25Params, ChunkIndex, Chunker, IndexBuilder};

/// Owns the document set and the published index.
///
/// Readers clone the current `Arc<ChunkIndex>` and work on it without holding
/// any lock. Writers assemble a complete index on the side and replace the
/// published one in a single swap, so a reader never sees a half-built index.
/// Writers are serialized through the pending-builder lock.
pub struct DocumentService {
    settings: Settings,
    params: Bm25Params,
    published: RwLock<Arc<ChunkIndex>>,
    pending: Mutex<IndexBuilder>,
    store: Option<Box<dyn SnapshotStore>>,
    snapshot_load: SnapshotLoad,
    extractor: Box<dyn TextExtractor>,
}

impl DocumentService {
    /// In-memory service without persistence.
    pub fn new(settings: Settings) -> Self {
        let pending = Self::empty_builder(&settings);
        Self {
            settings,
            params: Bm25Params::default(),
            published: RwLock::new(Arc::new(ChunkIndex::empty())),
            pending: Mutex::new(pending),
            store: None,
            snapshot_load: SnapshotLoad::Disabled,
            extractor: Box::new(PlainTextExtractor),
        }
    }

    /// Service backed by `store`, rehydrated from its snapshot if one exists.
    ///
    /// A missing, empty or unreadable snapshot starts the service empty; which
    /// of those happened is kept in [`snapshot_load`](Self::snapshot_load).
    pub fn open(settings: Settings, store: Box<dyn SnapshotStore>) -> Self {
        let mut service = Self::new(settings);
        service.snapshot_load = match store.load() {
            Ok(Some(snapshot)) if !snapshot.chunks.is_empty() => {
                let Snapshot { documents, chunks, saved_at } = snapshot;
                let builder = IndexBuilder::from_parts(
                    service.chunker(),
                    service.settings.chunking.min_chunk_chars,
                    documents.clone(),
                    chunks.clone(),
                );
                let index = ChunkIndex::build(documents, chunks, service.params);
                info!(documents = index.documents().len(), chunks = index.chunks().len(), ?saved_at, "index loaded from snapshot");
                let loaded = SnapshotLoad::Loaded { documents: index.documents().len(), chunks: index.chunks().len() };
                service.pending = Mutex::new(builder);
                service.published = RwLock::new(Arc::new(index));
                loaded
            }
            Ok(_) => {
                info!("no previous index, starting empty");
                SnapshotLoad::Missing
            }
            Err(e) => {
                warn!(error = %e, "failed to load snapshot, starting empty");
                SnapshotLoad::Discarded { reason: e.to_string() }
            }
        };
        service.store = Some(store);
        service
    }

    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_bm25_params(mut self, params: Bm25Params) -> Self {
        self.params = params;
        self
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn snapshot_load(&self) -> &SnapshotLoad { &self.snapshot_load }

    /// Snapshot of the published index; stays valid across later rebuilds.
    pub fn current(&self) -> Arc<ChunkIndex> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Normalize, chunk and stage a document for the next [`build_index`](Self::build_index).
    pub fn add_document(&self, name: &str, raw_text: &str) -> usize {
        let kept = self.lock_pending().add_document(name, raw_text);
        debug!(document = name, chunks = kept, "document staged");
        kept
    }

    /// Decode `file` with the configured extractor and stage it.
    ///
    /// Fails without staging anything when extraction fails or the text is
    /// shorter than `ingest.min_text_chars`.
    pub fn add_file(&self, file: &SourceFile) -> anyhow::Result<usize> {
        let text = self.extract_text(file)?;
        Ok(self.add_document(&file.name, &text))
    }

    /// Build from everything staged since the last clear and publish it.
    ///
    /// Returns `None` without touching the published index when nothing is staged.
    pub fn build_index(&self) -> Option<BuildSummary> {
        let pending = self.lock_pending();
        if pending.is_empty() { return None; }
        let index = pending.clone().build(self.params);
        Some(self.publish(index))
    }

    /// Drop documents, chunks and the index; the snapshot is removed too.
    pub fn clear_index(&self) {
        let mut pending = self.lock_pending();
        pending.clear();
        self.swap(Arc::new(ChunkIndex::empty()));
        if let Some(store) = &self.store {
            if let Err(e) = store.remove() { warn!(error = %e, "failed to remove snapshot"); }
        }
        info!("index cleared");
    }

    /// Replace the whole document set with a validated batch of files.
    ///
    /// Any rejection leaves the published index untouched.
    pub fn ingest(&self, files: Vec<SourceFile>) -> Result<IngestReport> {
        let ingest = &self.settings.ingest;
        let received = files.len();
        if received < ingest.min_files {
            return Err(Error::TooFewFiles { received, min: ingest.min_files });
        }
        if received > ingest.max_files {
            return Err(Error::TooManyFiles { received, max: ingest.max_files });
        }
        let unsupported: Vec<String> = files
            .iter()
            .filter(|f| !f.extension().is_some_and(|ext| ingest.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext))))
            .map(|f| f.name.clone())
            .collect();
        if !unsupported.is_empty() { return Err(Error::UnsupportedFormat(unsupported)); }

        let mut pending = self.lock_pending();
        let mut builder = Self::empty_builder(&self.settings);
        let mut processed = Vec::new();
        let mut errors = Vec::new();
        for file in &files {
            match self.extract_text(file) {
                Ok(text) => {
                    builder.add_document(&file.name, &text);
                    processed.push(file.name.clone());
                }
                Err(e) => errors.push(format!("{}: {}", file.name, e)),
            }
        }
        if processed.len() < ingest.min_valid_documents {
            warn!(processed = processed.len(), required = ingest.min_valid_documents, "ingest batch rejected");
            return Err(Error::InsufficientDocuments {
                processed: processed.len(),
                required: ingest.min_valid_documents,
                errors,
            });
        }

        *pending = builder.clone();
        let summary = self.publish(builder.build(self.params));
        info!(files = processed.len(), chunks = summary.chunks, "ingest accepted");

        let mut message = format!("Se procesaron {} de {} archivos exitosamente", processed.len(), received);
        if !errors.is_empty() { message.push_str(&format!(". Hubo errores en {} archivo(s)", errors.len())); }
        Ok(IngestReport { message, files_processed: processed.len(), files_list: processed, errors })
    }

    /// Search with the configured `search.top_k` and `search.min_score`.
    pub fn search(&self, query: &str) -> SearchOutcome {
        self.search_top_k(query, self.settings.search.top_k)
    }

    pub fn search_top_k(&self, query: &str, top_k: usize) -> SearchOutcome {
        search(&self.current(), query, top_k, self.settings.search.min_score)
    }

    pub fn answer_question(&self, question: &str) -> AnswerOutcome {
        let options = AnswerOptions { top_k: self.settings.answer.top_k, min_score: self.settings.answer.min_score };
        answer_question(&self.current(), question, options)
    }

    pub fn document_count(&self) -> usize { self.current().documents().len() }

    pub fn document_names(&self) -> Vec<String> { self.current().document_names() }

    pub fn info(&self) -> IndexInfo {
        let index = self.current();
        IndexInfo {
            documents_count: index.documents().len(),
            chunks_count: index.chunks().len(),
            has_index: index.is_indexed(),
            snapshot_exists: self.store.as_ref().is_some_and(|s| s.exists()),
            snapshot_load: self.snapshot_load.clone(),
            document_names: index.document_names(),
        }
    }

    fn extract_text(&self, file: &SourceFile) -> anyhow::Result<String> {
        let min = self.settings.ingest.min_text_chars;
        let text = self.extractor.extract(file).map_err(|e| {
            warn!(file = %file.name, error = %e, "extraction failed");
            anyhow!("Error al procesar - {e}")
        })?;
        if text.trim().chars().count() < min {
            warn!(file = %file.name, "empty or too short");
            bail!("Archivo vacío o muy corto (menos de {min} caracteres)");
        }
        Ok(text)
    }

    fn chunker(&self) -> Chunker {
        Chunker::new(self.settings.chunking.chunk_size, self.settings.chunking.overlap)
    }

    fn empty_builder(settings: &Settings) -> IndexBuilder {
        let chunker = Chunker::new(settings.chunking.chunk_size, settings.chunking.overlap);
        IndexBuilder::new(chunker, settings.chunking.min_chunk_chars)
    }

    fn lock_pending(&self) -> MutexGuard<'_, IndexBuilder> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn swap(&self, index: Arc<ChunkIndex>) {
        *self.published.write().unwrap_or_else(PoisonError::into_inner) = index;
    }

    fn publish(&self, index: ChunkIndex) -> BuildSummary {
        let index = Arc::new(index);
        self.swap(Arc::clone(&index));
        let persistence = self.persist(&index);
        info!(documents = index.documents().len(), chunks = index.chunks().len(), ?persistence, "index published");
        BuildSummary { documents: index.documents().len(), chunks: index.chunks().len(), persistence }
    }

    fn persist(&self, index: &ChunkIndex) -> Persistence {
        let Some(store) = &self.store else { return Persistence::Disabled };
        let snapshot = Snapshot::new(index.documents().to_vec(), index.chunks().to_vec());
        match store.save(&snapshot) {
            Ok(()) => Persistence::Saved,
            Err(e) => {
                warn!(error = %e, "failed to save snapshot");
                Persistence::Failed(e.to_string())
            }
        }
    }
}
