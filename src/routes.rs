use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{authors, books, query, tags, user_books};
use crate::middleware::token_gate;
use crate::state::AppState;

/// Build the full application router.
///
/// Catalog search and health are public; every resource route sits behind
/// the token gate.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/author", get(authors::list).post(authors::create))
        .route("/author/:id", get(authors::get).delete(authors::delete))
        .route("/book", get(books::list).post(books::create))
        .route("/book/:id", get(books::get).delete(books::delete))
        .route("/tag", get(tags::list).post(tags::create))
        .route("/tag/:id", get(tags::get).delete(tags::delete))
        .route(
            "/user_book/:user_id",
            get(user_books::list).post(user_books::create),
        )
        .route(
            "/user_book/:user_id/:id",
            get(user_books::get).delete(user_books::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), token_gate));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/query/author", get(query::author_search))
        .route("/query/title", get(query::title_search))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "MyBooks API",
        "version": version,
        "description": "Book catalog web services - authors, books, tags and user reading lists",
        "endpoints": {
            "home": "/ (public)",
            "query": "/query/author, /query/title (public - catalog search)",
            "author": "/author[/:id] (protected)",
            "book": "/book[/:id] (protected)",
            "tag": "/tag[/:id] (protected)",
            "user_book": "/user_book/:user_id[/:id] (protected)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
