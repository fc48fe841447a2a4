//! HTTP front-end for the city search engine. Loads the JSON document
//! store, builds the index once at startup, and serves queries against
//! the shared read-only index.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use citysearch_core::{Corpus, CorpusStats, KeywordHit, SearchEngine};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    10
}

#[derive(Deserialize)]
pub struct KeywordParams {
    pub word: String,
}

#[derive(Deserialize)]
pub struct StatsParams {
    #[serde(default = "default_top_terms")]
    pub top_terms: usize,
}

fn default_top_terms() -> usize {
    10
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    /// Stored document text, shown alongside the score.
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct KeywordResponse {
    pub keyword: String,
    pub results: Vec<KeywordHit>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    /// Upper bound on `top_n` per request, so one query cannot ask for an
    /// unbounded response payload.
    pub top_n_cap: usize,
}

/// Loads the store file, builds the index, and wires up the router.
pub fn build_app(data_path: &str, top_n_cap: usize) -> Result<Router> {
    let corpus = Corpus::load_json(data_path)?;
    tracing::info!(num_docs = corpus.len(), data_path, "corpus loaded");
    let engine = SearchEngine::with_index(corpus);
    let state = AppState {
        engine: Arc::new(engine),
        top_n_cap,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/keyword", get(keyword_handler))
        .route("/doc/:id", get(doc_handler))
        .route("/vocabulary", get(vocabulary_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();
    let top_n = params.top_n.min(state.top_n_cap);
    let hits = state
        .engine
        .rank_search(&params.q, top_n)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let results = hits
        .into_iter()
        .map(|hit| {
            let text = state.engine.corpus().get_text(&hit.id).map(str::to_string);
            SearchHit {
                id: hit.id,
                score: hit.score,
                text,
            }
        })
        .collect();
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        results,
    }))
}

pub async fn keyword_handler(
    State(state): State<AppState>,
    Query(params): Query<KeywordParams>,
) -> Json<KeywordResponse> {
    let results = state.engine.keyword_search(&params.word);
    Json(KeywordResponse {
        keyword: params.word,
        results,
    })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.engine.corpus().get(&id) {
        Some(doc) => Ok(Json(serde_json::json!({
            "id": doc.id,
            "text": doc.text,
            "url": doc.url,
            "author": doc.author,
            "date": doc.date,
        }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found", "id": id })),
        )),
    }
}

pub async fn vocabulary_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    state
        .engine
        .vocabulary()
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

pub async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Json<CorpusStats> {
    Json(state.engine.stats(params.top_terms))
}
