use tracing::debug;

use docqa_core::types::{SearchHit, SearchOutcome};

use crate::index::ChunkIndex;
use crate::text_utils::{clean_text, tokenize};

/// Raw BM25 scores are divided by this to get a relevance score.
pub const SCORE_SCALE: f64 = 10.0;

/// Minimum number of distinct query tokens a hit must contain, unless the
/// whole query appears verbatim.
pub const MIN_KEYWORD_MATCHES: usize = 2;

/// Top `top_k` chunks by raw score, then gated on relevance and keyword overlap.
///
/// A candidate survives when `score / SCORE_SCALE >= min_score` and it either
/// contains at least [`MIN_KEYWORD_MATCHES`] distinct query tokens or the
/// normalized query as a substring. Gating never reorders. An absent index
/// yields no hits.
pub fn retrieve(index: &ChunkIndex, query: &str, top_k: usize, min_score: f64) -> Vec<SearchHit> {
	if !index.is_indexed() || index.chunks().is_empty() { return Vec::new(); }

	let cleaned = clean_text(query);
	let query_tokens = tokenize(&cleaned);
	let scores = index.score(&query_tokens);

	let mut order: Vec<usize> = (0..scores.len()).collect();
	// Stable sort: equal scores keep indexing order.
	order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
	order.truncate(top_k);

	let mut distinct: Vec<&str> = Vec::with_capacity(query_tokens.len());
	for t in &query_tokens {
		if !distinct.contains(&t.as_str()) { distinct.push(t.as_str()); }
	}
	let phrase = cleaned.to_lowercase();

	let mut hits = Vec::new();
	for idx in order {
		let chunk = &index.chunks()[idx];
		let relevance_score = scores[idx] / SCORE_SCALE;
		let haystack = chunk.text.to_lowercase();
		let keyword_matches = distinct.iter().filter(|t| haystack.contains(**t)).count();
		let phrase_match = haystack.contains(&phrase);
		if relevance_score >= min_score && (keyword_matches >= MIN_KEYWORD_MATCHES || phrase_match) {
			hits.push(SearchHit {
				text: chunk.text.clone(),
				document_name: chunk.document_name.clone(),
				relevance_score,
			});
		}
	}
	debug!(query = %cleaned, tokens = query_tokens.len(), hits = hits.len(), "retrieved");
	hits
}

/// [`retrieve`] wrapped so callers can tell "no index" from "no match".
pub fn search(index: &ChunkIndex, query: &str, top_k: usize, min_score: f64) -> SearchOutcome {
	if !index.is_indexed() { return SearchOutcome::NotIndexed; }
	SearchOutcome::from_hits(retrieve(index, query, top_k, min_score))
}
