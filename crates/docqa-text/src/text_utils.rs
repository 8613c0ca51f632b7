use regex::Regex;
use std::sync::OnceLock;

/// Punctuation kept by [`clean_text`]; everything else that is not a word
/// character or whitespace becomes a space.
const KEPT_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '¿', '¡', '-', '(', ')'];

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?'];

const SUMMARY_MAX_CHARS: usize = 300;

/// Normalize raw document or query text.
///
/// Line breaks and tabs become spaces, characters outside word characters,
/// whitespace and [`KEPT_PUNCTUATION`] become spaces, runs of whitespace
/// collapse to one space and the result is trimmed. Idempotent.
pub fn clean_text(text: &str) -> String {
	let replaced: String = text
		.chars()
		.map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() || KEPT_PUNCTUATION.contains(&c) { c } else { ' ' })
		.collect();
	replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase tokens longer than two characters.
///
/// Indexing and querying must go through this same function.
pub fn tokenize(text: &str) -> Vec<String> {
	text.to_lowercase()
		.replace(|c: char| matches!(c, ',' | '.' | '!' | '?'), " ")
		.split_whitespace()
		.filter(|t| t.chars().count() > 2)
		.map(str::to_string)
		.collect()
}

/// Split on whitespace runs that directly follow `.`, `!` or `?`.
///
/// Terminal punctuation stays attached to its sentence. Fragments that are
/// empty after trimming are skipped.
pub fn split_sentences(text: &str) -> Vec<&str> {
	let mut sentences = Vec::new();
	let mut start = 0;
	for m in sentence_end().find_iter(text) {
		// Terminators are single-byte ASCII.
		push_trimmed(&mut sentences, &text[start..m.start() + 1]);
		start = m.end();
	}
	push_trimmed(&mut sentences, &text[start..]);
	sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, fragment: &'a str) {
	let fragment = fragment.trim();
	if !fragment.is_empty() { out.push(fragment); }
}

/// A sentence terminator followed by whitespace. Shared by [`split_sentences`]
/// and [`first_sentences`].
fn sentence_end() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence boundary pattern is valid"))
}

fn ends_with_terminator(s: &str) -> bool {
	s.ends_with(SENTENCE_TERMINATORS)
}

/// Short extractive summary: the first `n` sentences, each closed with a
/// period, capped at 300 characters.
pub fn first_sentences(text: &str, n: usize) -> String {
	if text.is_empty() { return String::new(); }
	let parts: Vec<String> = sentence_end()
		.split(text)
		.take(n)
		.map(str::trim)
		.filter(|p| !p.is_empty())
		.map(|p| if ends_with_terminator(p) { p.to_string() } else { format!("{p}.") })
		.collect();
	let mut result = parts.join(" ");
	if result.chars().count() > SUMMARY_MAX_CHARS {
		result = result.chars().take(SUMMARY_MAX_CHARS - 3).collect::<String>() + "...";
	}
	if !result.is_empty() && !ends_with_terminator(&result) { result.push('.'); }
	result
}
