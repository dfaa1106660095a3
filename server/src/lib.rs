use anyhow::{Context, Result};
use axum::{extract::{Query, State}, routing::get, Json, Router};
use search_core::{IndexPaths, QueryEngine, QueryResult, ScoredDocument, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub outcome: &'static str,
    pub total_hits: usize,
    pub results: Vec<ScoredDocument>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
}

/// Load the collection's index, building it from `<collection>.xml` first if
/// the index files are missing.
pub fn open_engine(collection: &Path) -> Result<QueryEngine> {
    let paths = IndexPaths::new(collection);
    let engine = QueryEngine::open_or_build(&paths)
        .with_context(|| format!("opening collection {}", collection.display()))?;
    tracing::info!(docs = engine.num_documents(), terms = engine.vocabulary_size(), "index ready");
    Ok(engine)
}

pub fn build_app(engine: Arc<QueryEngine>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let result = state.engine.search(&params.q);
    let outcome = outcome_name(&result);
    let results: Vec<ScoredDocument> = result.hits().iter().take(params.k.max(1)).cloned().collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, outcome, hits = results.len(), "search served");
    Json(SearchResponse {
        query: params.q,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        outcome,
        total_hits: result.hits().len(),
        results,
    })
}

fn outcome_name(result: &QueryResult) -> &'static str {
    match result {
        QueryResult::OutOfVocabulary => "out_of_vocabulary",
        QueryResult::NoResults => "no_results",
        QueryResult::Ranked(_) => "ranked",
    }
}

pub const OOV_MESSAGE: &str = "Sorry, I didn't find any documents for this query.";
pub const NO_RESULTS_MESSAGE: &str = "Query terms too common. Please use more specific terms.";

/// Prompt for queries until an empty line (or end of input) and print each
/// outcome.
pub fn run_console<R: BufRead, W: Write>(engine: &QueryEngine, mut input: R, mut out: W) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "\nPlease enter query terms separated by whitespace: ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim_end_matches(&['\r', '\n'][..]);
        if query.is_empty() {
            break;
        }
        match engine.search(query) {
            QueryResult::OutOfVocabulary => writeln!(out, "{OOV_MESSAGE}")?,
            QueryResult::NoResults => writeln!(out, "{NO_RESULTS_MESSAGE}")?,
            QueryResult::Ranked(hits) => {
                writeln!(out, "I found the following documents:")?;
                for h in hits {
                    writeln!(out, "{}\t{}", h.doc_id, h.score)?;
                }
            }
        }
    }
    Ok(())
}
