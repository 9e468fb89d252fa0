//! The /query resource: catalog search against openlibrary.org.
//!
//! Public endpoints; nothing here touches the local database. The upstream
//! documents carry openlibrary's own field names, so they are mapped to
//! stable result beans before leaving this service.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::openlibrary::{self, AuthorDoc, ImageSize, TitleDoc};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthorSearchParams {
    pub author: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleSearchParams {
    pub author: Option<String>,
    pub title: Option<String>,
    pub isbn: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryAuthorResult {
    pub name: String,
    pub birth_date: Option<String>,
    pub ol_key: String,
    pub subjects: Vec<String>,
    pub author_image_small: String,
    pub author_image_medium: String,
    pub author_image_large: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryTitleResult {
    pub title: Option<String>,
    pub author_key: Option<String>,
    pub author_name: Option<String>,
    pub works_key: Option<String>,
    pub first_published_year: Option<i32>,
    pub isbns: Vec<String>,
    pub subjects: Vec<String>,
    pub openlibrary_keys: Vec<String>,
    pub cover_image_small: Option<String>,
    pub cover_image_medium: Option<String>,
    pub cover_image_large: Option<String>,
}

/// GET /query/author - search openlibrary for authors by name.
pub async fn author_search(
    State(state): State<AppState>,
    Query(params): Query<AuthorSearchParams>,
) -> Result<Json<Vec<QueryAuthorResult>>, ApiError> {
    let docs = state
        .openlibrary
        .search_authors(&params.author)
        .await
        .map_err(search_failed)?;

    let mut results: Vec<QueryAuthorResult> = docs.into_iter().map(author_to_result).collect();
    results.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(results))
}

/// GET /query/title - search openlibrary for book titles.
///
/// Titles with more associated isbns sort first; those are the
/// best-identified editions.
pub async fn title_search(
    State(state): State<AppState>,
    Query(params): Query<TitleSearchParams>,
) -> Result<Json<Vec<QueryTitleResult>>, ApiError> {
    let docs = state
        .openlibrary
        .search_titles(
            params.author.as_deref(),
            params.title.as_deref(),
            params.isbn.as_deref(),
        )
        .await
        .map_err(search_failed)?;

    let mut results: Vec<QueryTitleResult> = docs.into_iter().map(title_to_result).collect();
    results.sort_by(|a, b| b.isbns.len().cmp(&a.isbns.len()));

    Ok(Json(results))
}

fn search_failed(e: anyhow::Error) -> ApiError {
    tracing::error!("openlibrary search failed: {}", e);
    ApiError::service_unavailable("catalog search is currently unavailable")
}

fn author_to_result(doc: AuthorDoc) -> QueryAuthorResult {
    QueryAuthorResult {
        author_image_small: openlibrary::author_image_url(&doc.key, ImageSize::Small),
        author_image_medium: openlibrary::author_image_url(&doc.key, ImageSize::Medium),
        author_image_large: openlibrary::author_image_url(&doc.key, ImageSize::Large),
        name: doc.name,
        birth_date: doc.birth_date,
        ol_key: doc.key,
        subjects: doc.top_subjects,
    }
}

fn title_to_result(doc: TitleDoc) -> QueryTitleResult {
    QueryTitleResult {
        cover_image_small: openlibrary::cover_image_url(&doc, ImageSize::Small),
        cover_image_medium: openlibrary::cover_image_url(&doc, ImageSize::Medium),
        cover_image_large: openlibrary::cover_image_url(&doc, ImageSize::Large),
        title: doc.title_suggest.or(doc.title),
        author_key: doc.author_key.into_iter().next(),
        author_name: doc.author_name.into_iter().next(),
        works_key: doc.key,
        first_published_year: doc.first_publish_year,
        isbns: doc.isbn,
        subjects: doc.subject,
        openlibrary_keys: doc.edition_key,
    }
}
