use crate::text_utils::split_sentences;

/// Closed chunks must be longer than this many characters to be emitted.
pub const MIN_EMITTED_CHARS: usize = 30;

/// Sentence-aligned chunker with a character budget and sentence overlap.
///
/// Sentences are accumulated until the next one would push the running chunk
/// past `chunk_size` characters. The closed chunk is emitted and the next one
/// starts with its trailing sentences, at least `overlap` characters worth.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
	chunk_size: usize,
	overlap: usize,
}

impl Default for Chunker {
	fn default() -> Self { Self { chunk_size: 300, overlap: 100 } }
}

impl Chunker {
	pub fn new(chunk_size: usize, overlap: usize) -> Self { Self { chunk_size, overlap } }

	pub fn chunk(&self, text: &str) -> Vec<String> {
		let mut chunks = Vec::new();
		let mut current = String::new();
		for sentence in split_sentences(text) {
			if char_len(&current) + char_len(sentence) + 1 > self.chunk_size && !current.is_empty() {
				let closed = current.trim().to_string();
				current = self.overlap_seed(&closed);
				if char_len(&closed) > MIN_EMITTED_CHARS { chunks.push(closed); }
			}
			if !current.is_empty() { current.push(' '); }
			current.push_str(sentence);
		}
		let tail = current.trim();
		if char_len(tail) > MIN_EMITTED_CHARS { chunks.push(tail.to_string()); }
		chunks
	}

	/// Trailing sentences of `closed`, walked backwards until they cover `overlap` characters.
	fn overlap_seed(&self, closed: &str) -> String {
		if self.overlap == 0 { return String::new(); }
		let sentences = split_sentences(closed);
		let mut total = 0;
		let mut start = sentences.len();
		for (i, s) in sentences.iter().enumerate().rev() {
			total += char_len(s) + 1;
			start = i;
			if total >= self.overlap { break; }
		}
		sentences[start..].join(" ")
	}
}

fn char_len(s: &str) -> usize { s.chars().count() }
