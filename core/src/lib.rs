//! TF-IDF indexing and ranked retrieval over a flat corpus of city
//! activity descriptions.
//!
//! The corpus is a snapshot of documents loaded from a JSON store. An
//! [`Index`] is built once per snapshot and queried read-only; the
//! [`SearchEngine`] wraps both and supports rebuild-and-swap.

pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod search;
pub mod tokenizer;

pub use corpus::{Corpus, CorpusStats, KeywordHit, TermCount};
pub use document::{Document, DocumentKind};
pub use engine::SearchEngine;
pub use error::EngineError;
pub use index::{Index, Vocabulary};
pub use search::RankedHit;
