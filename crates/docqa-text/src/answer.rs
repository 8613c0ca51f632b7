//! Sentence-level answer extraction over retrieved chunks.

use std::collections::HashSet;

use docqa_core::types::{Answer, AnswerOutcome, Citation, SearchHit};

use crate::index::ChunkIndex;
use crate::search::retrieve;
use crate::text_utils::{clean_text, first_sentences, split_sentences, tokenize};

pub const NO_INFORMATION: &str = "No encuentro esa información en los documentos cargados.";

pub const NO_SPECIFIC_INFORMATION: &str =
	"No encuentro información específica sobre esa pregunta en los documentos.";

pub const NO_CITATIONS: &str = "No encuentro esa información en los documentos cargados. \
	Por favor, verifica que los documentos contengan información sobre tu pregunta.";

pub const NOT_INDEXED: &str =
	"No hay documentos indexados. Por favor, use /ingest primero para cargar documentos";

/// Chunks inspected for the best sentence and for citations.
const SENTENCE_SOURCES: usize = 3;
const MAX_CITATIONS: usize = 3;
/// Chunks summarized when no sentence overlaps the question.
const SUMMARY_SOURCES: usize = 2;
const SUMMARY_SENTENCES: usize = 2;
/// Sentences must be longer than this (trimmed) to be picked as the answer.
const MIN_ANSWER_SENTENCE_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerOptions {
	pub top_k: usize,
	pub min_score: f64,
}

impl Default for AnswerOptions {
	fn default() -> Self { Self { top_k: 5, min_score: 0.15 } }
}

/// Pick the sentence sharing the most tokens with `question` and collect citations.
///
/// Citations are the first sentence of each inspected chunk, independent of
/// which chunk supplied the answer. With no overlapping sentence the answer
/// falls back to a short summary of the leading hits.
pub fn extract_answer(question: &str, hits: &[SearchHit]) -> Answer {
	if hits.is_empty() {
		return Answer { text: NO_INFORMATION.to_string(), citations: Vec::new() };
	}
	let question_tokens: HashSet<String> = tokenize(&clean_text(question)).into_iter().collect();

	let mut best: Option<&str> = None;
	let mut best_overlap = 0;
	let mut citations = Vec::new();
	for hit in hits.iter().take(SENTENCE_SOURCES) {
		let sentences = split_sentences(&hit.text);
		for &sentence in &sentences {
			if sentence.trim().chars().count() <= MIN_ANSWER_SENTENCE_CHARS { continue; }
			let overlap = tokenize(sentence).into_iter().collect::<HashSet<_>>().intersection(&question_tokens).count();
			if overlap > best_overlap {
				best_overlap = overlap;
				best = Some(sentence);
			}
		}
		if citations.len() < MAX_CITATIONS {
			if let Some(first) = sentences.first() {
				citations.push(Citation { text: first.trim().to_string(), document_name: hit.document_name.clone() });
			}
		}
	}

	let text = match best {
		Some(sentence) => sentence.trim().to_string(),
		None => {
			let parts: Vec<String> = hits
				.iter()
				.take(SUMMARY_SOURCES)
				.map(|h| first_sentences(&h.text, SUMMARY_SENTENCES))
				.filter(|s| !s.is_empty())
				.collect();
			if parts.is_empty() { NO_SPECIFIC_INFORMATION.to_string() } else { parts.join(" ") }
		}
	};
	Answer { text, citations }
}

/// Retrieve with the looser answer threshold and extract an answer.
///
/// An answer without citations is reported as not found.
pub fn answer_question(index: &ChunkIndex, question: &str, options: AnswerOptions) -> AnswerOutcome {
	if !index.is_indexed() { return AnswerOutcome::NotIndexed; }
	let hits = retrieve(index, question, options.top_k, options.min_score);
	if hits.is_empty() { return AnswerOutcome::NotFound(NO_INFORMATION.to_string()); }
	let answer = extract_answer(question, &hits);
	if answer.citations.is_empty() { return AnswerOutcome::NotFound(NO_CITATIONS.to_string()); }
	AnswerOutcome::Answered(answer)
}
