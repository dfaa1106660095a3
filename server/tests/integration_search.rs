use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use search_core::persist::{save_index, IndexPaths};
use search_core::{IndexBuilder, QueryEngine};
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

async fn collect_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn build_tiny_index(dir: &std::path::Path) -> IndexPaths {
    let paths = IndexPaths::new(dir.join("tiny"));
    let mut b = IndexBuilder::new();
    b.add_document("doc0", ["rust", "rust", "system", "program"]).unwrap();
    b.add_document("doc1", ["learn", "rust", "slowli", "care", "patienc"]).unwrap();
    b.add_document("doc2", ["garden", "tomato"]).unwrap();
    b.add_document("doc3", ["garden", "rose", "program"]).unwrap();
    save_index(&paths, &b.build().unwrap()).unwrap();
    paths
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    (status, collect_json(resp.into_body()).await)
}

fn app_for(paths: &IndexPaths) -> Router {
    let engine = QueryEngine::load(paths).unwrap();
    server::build_app(Arc::new(engine))
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path());
    let app = app_for(&paths);

    let (status, json) = call(app, "/search?q=rust&k=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "ranked");
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"], "doc0");
    assert_eq!(arr[1]["doc_id"], "doc1");
    assert!(arr[0]["score"].as_f64().unwrap() > arr[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn k_truncates_results() {
    let dir = tempdir().unwrap();
    let app = app_for(&build_tiny_index(dir.path()));

    let (_, json) = call(app, "/search?q=garden%20program&k=1").await;
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    assert!(json["total_hits"].as_u64().unwrap() > 1);
}

#[tokio::test]
async fn unknown_terms_report_out_of_vocabulary() {
    let dir = tempdir().unwrap();
    let app = app_for(&build_tiny_index(dir.path()));

    let (status, json) = call(app, "/search?q=zebra").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "out_of_vocabulary");
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn health_check() {
    let dir = tempdir().unwrap();
    let app = app_for(&build_tiny_index(dir.path()));
    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
