use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use docqa_core::types::{DocumentChunk, SourceDocument};

use crate::chunker::Chunker;
use crate::text_utils::{clean_text, tokenize};

/// Okapi BM25 free parameters.
///
/// `epsilon` floors negative IDF values (terms present in more than half of
/// the chunks) at `epsilon * mean_idf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
	pub k1: f64,
	pub b: f64,
	pub epsilon: f64,
}

impl Default for Bm25Params {
	fn default() -> Self { Self { k1: 1.2, b: 0.75, epsilon: 0.25 } }
}

/// Term statistics over an ordered list of tokenized chunks.
#[derive(Debug, Clone)]
pub struct Bm25Index {
	params: Bm25Params,
	term_freqs: Vec<HashMap<String, u32>>,
	chunk_lens: Vec<usize>,
	avg_len: f64,
	idf: HashMap<String, f64>,
}

impl Bm25Index {
	/// Returns `None` for an empty corpus.
	pub fn build<S: AsRef<[String]>>(tokenized: &[S], params: Bm25Params) -> Option<Self> {
		if tokenized.is_empty() { return None; }
		let mut term_freqs = Vec::with_capacity(tokenized.len());
		let mut chunk_lens = Vec::with_capacity(tokenized.len());
		// BTreeMap keeps the IDF mean summation order stable across runs.
		let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
		for tokens in tokenized {
			let tokens = tokens.as_ref();
			chunk_lens.push(tokens.len());
			let mut tf: HashMap<String, u32> = HashMap::new();
			for t in tokens { *tf.entry(t.clone()).or_insert(0) += 1; }
			for term in tf.keys() { *doc_freq.entry(term.clone()).or_insert(0) += 1; }
			term_freqs.push(tf);
		}
		let n = tokenized.len() as f64;
		let total: usize = chunk_lens.iter().sum();
		let avg_len = total as f64 / n;

		let mut idf = HashMap::with_capacity(doc_freq.len());
		let mut idf_sum = 0.0;
		let mut negative = Vec::new();
		for (term, df) in &doc_freq {
			let df = *df as f64;
			let value = (n - df + 0.5).ln() - (df + 0.5).ln();
			idf_sum += value;
			if value < 0.0 { negative.push(term.as_str()); }
			idf.insert(term.clone(), value);
		}
		if !doc_freq.is_empty() {
			let floor = params.epsilon * idf_sum / doc_freq.len() as f64;
			for term in negative { idf.insert(term.to_string(), floor); }
		}
		debug!(chunks = tokenized.len(), terms = idf.len(), avg_len, "built bm25 statistics");
		Some(Self { params, term_freqs, chunk_lens, avg_len, idf })
	}

	pub fn len(&self) -> usize { self.chunk_lens.len() }

	pub fn is_empty(&self) -> bool { self.chunk_lens.is_empty() }

	pub fn avg_len(&self) -> f64 { self.avg_len }

	pub fn idf(&self, term: &str) -> Option<f64> { self.idf.get(term).copied() }

	/// One raw score per indexed chunk, in indexing order.
	///
	/// Repeated query terms contribute once per occurrence.
	pub fn score(&self, query: &[String]) -> Vec<f64> {
		let Bm25Params { k1, b, .. } = self.params;
		// All-empty chunks: avoid 0/0, no term can match anyway.
		let avg_len = if self.avg_len > 0.0 { self.avg_len } else { 1.0 };
		let mut scores = vec![0.0; self.len()];
		for term in query {
			let Some(idf) = self.idf.get(term).copied() else { continue };
			for (i, tf) in self.term_freqs.iter().enumerate() {
				let Some(&f) = tf.get(term) else { continue };
				let f = f64::from(f);
				let len_norm = 1.0 - b + b * self.chunk_lens[i] as f64 / avg_len;
				scores[i] += idf * (f * (k1 + 1.0)) / (f + k1 * len_norm);
			}
		}
		scores
	}
}

/// Published, immutable view of all documents, chunks and their statistics.
///
/// Either absent (`bm25` is `None`, nothing searchable) or built from exactly
/// the `chunks` it holds.
#[derive(Debug, Clone, Default)]
pub struct ChunkIndex {
	documents: Vec<SourceDocument>,
	chunks: Vec<DocumentChunk>,
	bm25: Option<Bm25Index>,
}

impl ChunkIndex {
	pub fn empty() -> Self { Self::default() }

	/// Build statistics over `chunks`. No chunks means an absent index.
	pub fn build(documents: Vec<SourceDocument>, chunks: Vec<DocumentChunk>, params: Bm25Params) -> Self {
		let tokenized: Vec<&[String]> = chunks.iter().map(|c| c.tokens.as_slice()).collect();
		let bm25 = Bm25Index::build(&tokenized, params);
		if bm25.is_none() { return Self::empty(); }
		Self { documents, chunks, bm25 }
	}

	pub fn is_indexed(&self) -> bool { self.bm25.is_some() }

	pub fn documents(&self) -> &[SourceDocument] { &self.documents }

	pub fn chunks(&self) -> &[DocumentChunk] { &self.chunks }

	pub fn bm25(&self) -> Option<&Bm25Index> { self.bm25.as_ref() }

	pub fn document_names(&self) -> Vec<String> { self.documents.iter().map(|d| d.name.clone()).collect() }

	/// Raw scores for already tokenized query terms; empty when absent.
	pub fn score(&self, query_tokens: &[String]) -> Vec<f64> {
		self.bm25.as_ref().map(|b| b.score(query_tokens)).unwrap_or_default()
	}
}

/// Accumulates documents and their chunks until an index is built.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
	chunker: Chunker,
	min_chunk_chars: usize,
	documents: Vec<SourceDocument>,
	chunks: Vec<DocumentChunk>,
}

impl IndexBuilder {
	pub fn new(chunker: Chunker, min_chunk_chars: usize) -> Self {
		Self { chunker, min_chunk_chars, documents: Vec::new(), chunks: Vec::new() }
	}

	/// Resume from previously built state; chunks and tokens are trusted as-is.
	pub fn from_parts(chunker: Chunker, min_chunk_chars: usize, documents: Vec<SourceDocument>, chunks: Vec<DocumentChunk>) -> Self {
		Self { chunker, min_chunk_chars, documents, chunks }
	}

	/// Normalize, chunk and tokenize one document.
	///
	/// Adding a name twice replaces the earlier text and chunks; the name keeps
	/// its original position. Returns the number of chunks kept.
	pub fn add_document(&mut self, name: &str, raw_text: &str) -> usize {
		let text = clean_text(raw_text);
		let new_chunks: Vec<DocumentChunk> = self
			.chunker
			.chunk(&text)
			.into_iter()
			.filter(|c| c.trim().chars().count() > self.min_chunk_chars)
			.map(|c| DocumentChunk { tokens: tokenize(&c), text: c, document_name: name.to_string() })
			.collect();
		let kept = new_chunks.len();

		if let Some(existing) = self.documents.iter_mut().find(|d| d.name == name) {
			existing.text = text;
			let mut rebuilt = Vec::with_capacity(self.chunks.len() + kept);
			let mut pending = Some(new_chunks);
			for chunk in self.chunks.drain(..) {
				if chunk.document_name == name {
					if let Some(replacement) = pending.take() { rebuilt.extend(replacement); }
					continue;
				}
				rebuilt.push(chunk);
			}
			if let Some(rest) = pending { rebuilt.extend(rest); }
			self.chunks = rebuilt;
		} else {
			self.documents.push(SourceDocument { name: name.to_string(), text });
			self.chunks.extend(new_chunks);
		}
		kept
	}

	pub fn document_count(&self) -> usize { self.documents.len() }

	pub fn chunk_count(&self) -> usize { self.chunks.len() }

	pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

	pub fn clear(&mut self) {
		self.documents.clear();
		self.chunks.clear();
	}

	/// Consume the accumulated state into a published index.
	pub fn build(self, params: Bm25Params) -> ChunkIndex {
		ChunkIndex::build(self.documents, self.chunks, params)
	}
}
