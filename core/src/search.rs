//! Query vectorization and cosine-similarity ranking against the TF-IDF
//! matrix.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::index::{Index, Vocabulary};
use crate::tokenizer::tokenize;

/// One ranked retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHit {
    pub id: String,
    pub score: f32,
}

/// Maps a free-text query into vocabulary space as raw term counts.
/// Out-of-vocabulary terms are silently dropped; an empty or fully
/// out-of-vocabulary query yields the zero vector.
pub(crate) fn query_vector(vocabulary: &Vocabulary, query: &str) -> Vec<f32> {
    let mut counts: HashMap<usize, u32> = HashMap::new();
    for token in tokenize(query) {
        if let Some(pos) = vocabulary.position(&token) {
            *counts.entry(pos).or_insert(0) += 1;
        }
    }
    let mut vector = vec![0.0; vocabulary.len()];
    for (pos, count) in counts {
        vector[pos] = count as f32;
    }
    vector
}

/// Cosine similarity, defined as 0 when either vector has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl Index {
    /// Ranks every document by cosine similarity between the query vector
    /// and its TF-IDF row, descending, truncated to `top_n`.
    ///
    /// Equal scores keep snapshot order (the sort is stable), which is the
    /// only tie-break. A query matching nothing returns all documents at
    /// score 0 in that order, truncated to `top_n`; this is not an error.
    pub fn rank_search(&self, query: &str, top_n: usize) -> Vec<RankedHit> {
        let query_vec = query_vector(self.vocabulary(), query);
        let mut hits: Vec<RankedHit> = self
            .doc_ids()
            .iter()
            .zip(self.tfidf())
            .map(|(id, row)| RankedHit {
                id: id.clone(),
                score: cosine_similarity(&query_vec, row),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(top_n);
        hits
    }
}
