use thiserror::Error;

/// Structural misuse of the engine. Numeric edge cases (zero-token
/// documents, zero-norm vectors, empty corpora) never error; they are
/// absorbed as well-defined zeros.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Ranked search was called before any index was built. Distinct from
    /// an index built over an empty corpus, which is valid and returns
    /// empty results.
    #[error("index has not been built; call build_index first")]
    IndexNotBuilt,
}
