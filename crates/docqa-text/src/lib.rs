//! docqa-text
//!
//! Lexical retrieval pipeline: text normalization, sentence-aligned chunking,
//! tokenization, BM25 scoring over an immutable [`ChunkIndex`], result gating
//! and sentence-level answer extraction. No I/O happens here.

pub mod answer;
pub mod chunker;
pub mod index;
pub mod search;
pub mod text_utils;

pub use answer::{answer_question, extract_answer, AnswerOptions};
pub use chunker::Chunker;
pub use index::{Bm25Index, Bm25Params, ChunkIndex, IndexBuilder};
pub use search::{retrieve, search};
pub use text_utils::{clean_text, first_sentences, split_sentences, tokenize};
