//! The document store: an ordered corpus snapshot backed by a flat JSON
//! file mapping each city name to its activity text.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::tokenizer::{tokenize, whole_word_matcher};

/// One entry of the flat store file: `{ "<city>": { "do": "<text>" } }`.
#[derive(Debug, Serialize, Deserialize)]
struct StoreEntry {
    #[serde(rename = "do")]
    activities: String,
}

/// A whole-word occurrence count for one document. Documents with zero
/// occurrences are never reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordHit {
    pub id: String,
    pub count: usize,
}

/// A term and its total occurrence count across the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Corpus-level statistics, computed on demand. Display formatting is the
/// caller's business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub num_documents: usize,
    pub total_chars: u64,
    pub avg_chars: f64,
    pub top_terms: Vec<TermCount>,
}

/// An ordered snapshot of documents.
///
/// Document order is fixed at load time (the JSON store is an object, so
/// loading sorts by id) and shared by every matrix built from the snapshot;
/// it is also the tie-break order for equal ranking scores.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    docs: Vec<Document>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// Builds a corpus from documents in the given order. A duplicate id
    /// keeps the first occurrence and drops the rest.
    pub fn from_documents(docs: Vec<Document>) -> Self {
        let mut kept = Vec::with_capacity(docs.len());
        let mut by_id = HashMap::with_capacity(docs.len());
        for doc in docs {
            if by_id.contains_key(&doc.id) {
                tracing::warn!(id = %doc.id, "duplicate document id, keeping first");
                continue;
            }
            by_id.insert(doc.id.clone(), kept.len());
            kept.push(doc);
        }
        Self { docs: kept, by_id }
    }

    /// Loads a snapshot from the flat JSON store file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading store file {}", path.display()))?;
        let entries: BTreeMap<String, StoreEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing store file {}", path.display()))?;
        let docs = entries
            .into_iter()
            .map(|(id, entry)| Document::new(id, entry.activities))
            .collect();
        Ok(Self::from_documents(docs))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.by_id.get(id).map(|&pos| &self.docs[pos])
    }

    /// Returns a document's text, or `None` for an unknown id.
    pub fn get_text(&self, id: &str) -> Option<&str> {
        self.get(id).map(|doc| doc.text.as_str())
    }

    /// Counts case-insensitive whole-word occurrences of `keyword` per
    /// document, in snapshot order. This path never consults the TF-IDF
    /// index; it scans raw text directly. A keyword absent everywhere
    /// yields an empty result, not an error.
    pub fn keyword_search(&self, keyword: &str) -> Vec<KeywordHit> {
        let matcher = whole_word_matcher(keyword);
        self.docs
            .iter()
            .filter_map(|doc| {
                let count = matcher.find_iter(&doc.text).count();
                (count > 0).then(|| KeywordHit {
                    id: doc.id.clone(),
                    count,
                })
            })
            .collect()
    }

    /// Computes corpus statistics with the `top_k` most frequent terms.
    /// Term counts use the raw (uncleaned) text; ties break alphabetically.
    pub fn stats(&self, top_k: usize) -> CorpusStats {
        let total_chars: u64 = self.docs.iter().map(|d| d.text.chars().count() as u64).sum();
        let avg_chars = if self.docs.is_empty() {
            0.0
        } else {
            total_chars as f64 / self.docs.len() as f64
        };

        let mut counts: HashMap<String, u64> = HashMap::new();
        for doc in &self.docs {
            for token in tokenize(&doc.text) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        let mut top_terms: Vec<TermCount> = counts
            .into_iter()
            .map(|(term, count)| TermCount { term, count })
            .collect();
        top_terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        top_terms.truncate(top_k);

        CorpusStats {
            num_documents: self.docs.len(),
            total_chars,
            avg_chars,
            top_terms,
        }
    }
}
