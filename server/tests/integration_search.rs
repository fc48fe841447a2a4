use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_store(dir: &std::path::Path) -> String {
    let path = dir.join("data.json");
    fs::write(
        &path,
        r#"{
            "Paris": {"do": "Visit the Eiffel Tower and enjoy the Seine cruise."},
            "London": {"do": "Explore the British Museum and Buckingham Palace."},
            "New York": {"do": "Walk in Central Park and visit Times Square."}
        }"#,
    )
    .unwrap();
    path.to_string_lossy().to_string()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn search_ranks_new_york_for_walk_park() {
    let dir = tempdir().unwrap();
    let app = citysearch_server::build_app(&write_store(dir.path()), 100).unwrap();

    let (status, json) = call(app, "/search?q=walk%20park&top_n=1").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "New York");
    assert!(results[0]["score"].as_f64().unwrap() > 0.0);
    assert!(results[0]["text"]
        .as_str()
        .unwrap()
        .contains("Central Park"));
}

#[tokio::test]
async fn empty_query_returns_every_document_at_score_zero() {
    let dir = tempdir().unwrap();
    let app = citysearch_server::build_app(&write_store(dir.path()), 100).unwrap();

    let (status, json) = call(app, "/search?q=").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    for hit in results {
        assert_eq!(hit["score"].as_f64().unwrap(), 0.0);
    }
}

#[tokio::test]
async fn top_n_is_clamped_to_the_server_cap() {
    let dir = tempdir().unwrap();
    let app = citysearch_server::build_app(&write_store(dir.path()), 2).unwrap();

    let (status, json) = call(app, "/search?q=&top_n=50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn keyword_endpoint_omits_documents_without_matches() {
    let dir = tempdir().unwrap();
    let app = citysearch_server::build_app(&write_store(dir.path()), 100).unwrap();

    let (status, json) = call(app, "/keyword?word=visit").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    let ids: Vec<&str> = results
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["New York", "Paris"]);
    for hit in results {
        assert_eq!(hit["count"].as_u64().unwrap(), 1);
    }
}

#[tokio::test]
async fn doc_endpoint_returns_text_or_not_found() {
    let dir = tempdir().unwrap();
    let store = write_store(dir.path());

    let app = citysearch_server::build_app(&store, 100).unwrap();
    let (status, json) = call(app, "/doc/Paris").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["text"].as_str().unwrap().contains("Eiffel Tower"));

    let app = citysearch_server::build_app(&store, 100).unwrap();
    let (status, json) = call(app, "/doc/Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}

#[tokio::test]
async fn vocabulary_and_stats_report_the_corpus() {
    let dir = tempdir().unwrap();
    let store = write_store(dir.path());

    let app = citysearch_server::build_app(&store, 100).unwrap();
    let (status, json) = call(app, "/vocabulary").await;
    assert_eq!(status, StatusCode::OK);
    let vocab: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(vocab.contains(&"visit"));
    assert!(vocab.contains(&"walk"));
    assert!(vocab.contains(&"tower"));

    let app = citysearch_server::build_app(&store, 100).unwrap();
    let (status, json) = call(app, "/stats?top_terms=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["num_documents"], 3);
    assert_eq!(json["top_terms"].as_array().unwrap().len(), 2);
}
