//! The engine facade: one corpus snapshot plus the index built from it.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::corpus::{Corpus, CorpusStats, KeywordHit};
use crate::error::EngineError;
use crate::index::Index;
use crate::search::RankedHit;

/// Owns a corpus snapshot and an atomically swappable index handle.
///
/// Concurrent queries clone the `Arc` out of the lock and run against an
/// immutable index; [`SearchEngine::build_index`] builds a fresh index and
/// swaps the handle in one write. There is no partial rebuild.
pub struct SearchEngine {
    corpus: Corpus,
    index: RwLock<Option<Arc<Index>>>,
}

impl SearchEngine {
    /// Creates an engine with no index yet. Ranked search will fail with
    /// [`EngineError::IndexNotBuilt`] until [`SearchEngine::build_index`]
    /// runs.
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            index: RwLock::new(None),
        }
    }

    /// Creates an engine and builds its index immediately.
    pub fn with_index(corpus: Corpus) -> Self {
        let engine = Self::new(corpus);
        engine.build_index();
        engine
    }

    /// (Re)builds the index from the current snapshot and atomically
    /// replaces any prior one.
    pub fn build_index(&self) {
        let index = Arc::new(Index::build(&self.corpus));
        *self.index.write() = Some(index);
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    fn current_index(&self) -> Result<Arc<Index>, EngineError> {
        self.index.read().clone().ok_or(EngineError::IndexNotBuilt)
    }

    /// Primary ranked retrieval. See [`Index::rank_search`].
    pub fn rank_search(&self, query: &str, top_n: usize) -> Result<Vec<RankedHit>, EngineError> {
        Ok(self.current_index()?.rank_search(query, top_n))
    }

    /// Whole-word occurrence counting on raw text; never touches the
    /// index, so it works before `build_index` too.
    pub fn keyword_search(&self, keyword: &str) -> Vec<KeywordHit> {
        self.corpus.keyword_search(keyword)
    }

    /// The built index's vocabulary, for diagnostics.
    pub fn vocabulary(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.current_index()?.vocabulary().terms().to_vec())
    }

    pub fn stats(&self, top_k: usize) -> CorpusStats {
        self.corpus.stats(top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn rank_search_before_build_fails_loudly() {
        let engine = SearchEngine::new(Corpus::from_documents(vec![Document::new(
            "Paris",
            "Visit the Eiffel Tower.",
        )]));
        assert_eq!(
            engine.rank_search("tower", 5),
            Err(EngineError::IndexNotBuilt)
        );
        assert_eq!(engine.vocabulary(), Err(EngineError::IndexNotBuilt));
    }

    #[test]
    fn built_empty_corpus_is_not_an_error() {
        let engine = SearchEngine::with_index(Corpus::default());
        assert_eq!(engine.rank_search("anything", 5), Ok(vec![]));
        assert_eq!(engine.vocabulary(), Ok(vec![]));
    }

    #[test]
    fn rebuild_replaces_the_index() {
        let engine = SearchEngine::with_index(Corpus::from_documents(vec![Document::new(
            "Paris",
            "Visit the Eiffel Tower.",
        )]));
        let before = engine.vocabulary().unwrap();
        engine.build_index();
        assert_eq!(engine.vocabulary().unwrap(), before);
    }

    #[test]
    fn keyword_search_works_without_an_index() {
        let engine = SearchEngine::new(Corpus::from_documents(vec![Document::new(
            "Paris",
            "Visit the Eiffel Tower.",
        )]));
        assert_eq!(engine.keyword_search("tower").len(), 1);
    }
}
