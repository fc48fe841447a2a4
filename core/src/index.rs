//! The static index artifact: vocabulary plus TF, IDF, and TF-IDF
//! matrices, built in one shot from a corpus snapshot.

use std::collections::{BTreeSet, HashMap};

use crate::corpus::Corpus;
use crate::tokenizer::{restrict_to_english, tokenize};

/// The sorted, deduplicated term set of one corpus snapshot. Each term's
/// position is its column index in every matrix built from the snapshot.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Vocabulary {
    fn from_texts<'a>(texts: impl Iterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<String> = texts.flat_map(|text| tokenize(text)).collect();
        let terms: Vec<String> = distinct.into_iter().collect();
        let positions = terms
            .iter()
            .enumerate()
            .map(|(pos, term)| (term.clone(), pos))
            .collect();
        Self { terms, positions }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Column index of a term, or `None` if it is out of vocabulary.
    pub fn position(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }
}

/// An immutable TF-IDF index over one corpus snapshot.
///
/// Built once by [`Index::build`] and queried read-only afterwards; a
/// corpus change means building a fresh `Index`, never mutating this one.
#[derive(Debug, Clone, Default)]
pub struct Index {
    doc_ids: Vec<String>,
    vocabulary: Vocabulary,
    tf: Vec<Vec<f32>>,
    idf: Vec<f32>,
    tfidf: Vec<Vec<f32>>,
}

impl Index {
    /// Builds the full index: vocabulary, TF matrix, IDF vector, TF-IDF
    /// matrix, all over the corpus's snapshot order.
    ///
    /// Tokenization asymmetry, kept as the system has always behaved: TF
    /// counts tokens of the English-restricted text, while the vocabulary
    /// and the IDF document-frequency scan see the raw text. Tokens that
    /// only exist in filtered form therefore get a zero TF column, and df
    /// uses substring containment (a document holding "category" counts
    /// for "cat").
    ///
    /// An empty corpus yields a zero-width index; a document with no
    /// tokens after filtering gets an all-zero TF row instead of a
    /// divide-by-zero.
    pub fn build(corpus: &Corpus) -> Self {
        let texts: Vec<&str> = corpus.documents().iter().map(|d| d.text.as_str()).collect();
        let doc_ids: Vec<String> = corpus.documents().iter().map(|d| d.id.clone()).collect();

        let vocabulary = Vocabulary::from_texts(texts.iter().copied());
        let tf = build_tf(&texts, &vocabulary);
        let idf = build_idf(&texts, &vocabulary);
        let tfidf = tf
            .iter()
            .map(|row| row.iter().zip(&idf).map(|(t, i)| t * i).collect())
            .collect();

        tracing::debug!(
            num_docs = doc_ids.len(),
            vocab_size = vocabulary.len(),
            "index built"
        );

        Self {
            doc_ids,
            vocabulary,
            tf,
            idf,
            tfidf,
        }
    }

    pub fn num_documents(&self) -> usize {
        self.doc_ids.len()
    }

    /// Document ids in snapshot order (row order of every matrix).
    pub fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tf(&self) -> &[Vec<f32>] {
        &self.tf
    }

    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    pub fn tfidf(&self) -> &[Vec<f32>] {
        &self.tfidf
    }
}

/// Normalized term frequencies per document: count / total tokens, over
/// the English-restricted text. Zero-token documents get all-zero rows.
fn build_tf(texts: &[&str], vocabulary: &Vocabulary) -> Vec<Vec<f32>> {
    texts
        .iter()
        .map(|text| {
            let filtered = restrict_to_english(text);
            let mut counts: HashMap<String, u32> = HashMap::new();
            let mut total: u32 = 0;
            for token in tokenize(&filtered) {
                *counts.entry(token).or_insert(0) += 1;
                total += 1;
            }
            if total == 0 {
                return vec![0.0; vocabulary.len()];
            }
            vocabulary
                .terms()
                .iter()
                .map(|term| counts.get(term).copied().unwrap_or(0) as f32 / total as f32)
                .collect()
        })
        .collect()
}

/// Smoothed inverse document frequency: `ln(N / (df + 1))`, where df is a
/// substring-containment count over lowercased raw text. The `+ 1` keeps
/// the quotient finite even at df = 0.
fn build_idf(texts: &[&str], vocabulary: &Vocabulary) -> Vec<f32> {
    let lowered: Vec<String> = texts.iter().map(|t| t.to_lowercase()).collect();
    let n = texts.len() as f32;
    vocabulary
        .terms()
        .iter()
        .map(|term| {
            let df = lowered.iter().filter(|text| text.contains(term)).count() as f32;
            (n / (df + 1.0)).ln()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn index_of(texts: &[(&str, &str)]) -> Index {
        let docs = texts
            .iter()
            .map(|(id, text)| Document::new(*id, *text))
            .collect();
        Index::build(&Corpus::from_documents(docs))
    }

    #[test]
    fn vocabulary_is_sorted_and_deduplicated() {
        let index = index_of(&[("a", "the tower the seine"), ("b", "tower walk")]);
        let terms = index.vocabulary().terms();
        assert_eq!(terms, ["seine", "the", "tower", "walk"]);
        let mut sorted = terms.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(terms, sorted.as_slice());
    }

    #[test]
    fn tf_rows_sum_to_one_for_nonempty_documents() {
        let index = index_of(&[("a", "walk in the park"), ("b", "visit the tower")]);
        for row in index.tf() {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_token_document_gets_an_all_zero_tf_row() {
        // The heart survives vocabulary tokenization as no token at all,
        // and the English restriction strips it before TF counting.
        let index = index_of(&[("empty", "❤"), ("b", "visit the tower")]);
        let sum: f32 = index.tf()[0].iter().sum();
        assert_eq!(sum, 0.0);
        let weights: f32 = index.tfidf()[0].iter().sum();
        assert_eq!(weights, 0.0);
    }

    #[test]
    fn idf_matches_the_smoothed_formula() {
        let index = index_of(&[("a", "cat and dog"), ("b", "a cat"), ("c", "birds")]);
        let vocab = index.vocabulary();
        let n = 3.0f32;
        // "cat" is contained in two documents; ln(3 / (2 + 1)) = 0.
        let cat = vocab.position("cat").unwrap();
        assert!((index.idf()[cat] - (n / 3.0).ln()).abs() < 1e-6);
        assert_eq!(index.idf()[cat], 0.0);
        // "birds" is contained in one; ln(3 / 2).
        let birds = vocab.position("birds").unwrap();
        assert!((index.idf()[birds] - (n / 2.0).ln()).abs() < 1e-6);
        for &idf in index.idf() {
            assert!(idf.is_finite());
        }
    }

    #[test]
    fn idf_document_frequency_is_substring_based() {
        let index = index_of(&[("a", "cat"), ("b", "category")]);
        let cat = index.vocabulary().position("cat").unwrap();
        // Both documents contain "cat" as a substring: ln(2 / 3) < 0.
        assert!((index.idf()[cat] - (2.0f32 / 3.0).ln()).abs() < 1e-6);
    }

    #[test]
    fn tfidf_is_the_elementwise_product() {
        let index = index_of(&[("a", "walk in the park"), ("b", "visit the tower")]);
        for (tf_row, tfidf_row) in index.tf().iter().zip(index.tfidf()) {
            for ((tf, idf), tfidf) in tf_row.iter().zip(index.idf()).zip(tfidf_row) {
                assert_eq!(tf * idf, *tfidf);
            }
        }
    }

    #[test]
    fn empty_corpus_builds_a_zero_width_index() {
        let index = Index::build(&Corpus::default());
        assert_eq!(index.num_documents(), 0);
        assert!(index.vocabulary().is_empty());
        assert!(index.tf().is_empty());
        assert!(index.idf().is_empty());
        assert!(index.tfidf().is_empty());
    }
}
