//! The /book resource.
//!
//! The list endpoint is the full admission/assembly pipeline: token gate
//! (route layer), predicate aggregation, author-name enrichment, then
//! windowing. Mutations additionally pass the role guard.

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use url::form_urlencoded;

use crate::auth::{Bearer, Principal};
use crate::database::models::{BookResult, NewBook};
use crate::enrich;
use crate::error::ApiError;
use crate::pagination::{self, Page};
use crate::query::{self, Predicate};
use crate::state::AppState;

/// Parameters of `GET /book`. `id` and `authorId` may repeat.
#[derive(Debug, Default, PartialEq, Eq)]
struct BookListParams {
    title: Option<String>,
    ids: Vec<i32>,
    author_ids: Vec<i32>,
    start: Option<i64>,
    segment_size: Option<i64>,
}

impl BookListParams {
    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(title) = &self.title {
            predicates.push(Predicate::TextMatch(title.clone()));
        }
        if !self.ids.is_empty() {
            predicates.push(Predicate::IdSet(self.ids.clone()));
        }
        if !self.author_ids.is_empty() {
            predicates.push(Predicate::ForeignKeys(self.author_ids.clone()));
        }
        predicates
    }
}

// axum's Query extractor keeps only the last value of a repeated key, so the
// list parameters are read from the raw query string instead.
fn parse_list_params(raw: Option<&str>) -> Result<BookListParams, ApiError> {
    let mut params = BookListParams::default();
    let Some(raw) = raw else {
        return Ok(params);
    };

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "title" => params.title = Some(value.into_owned()),
            "id" => params.ids.push(parse_param(&key, &value)?),
            "authorId" => params.author_ids.push(parse_param(&key, &value)?),
            "start" => params.start = Some(parse_param(&key, &value)?),
            "segmentSize" => params.segment_size = Some(parse_param(&key, &value)?),
            _ => {}
        }
    }
    Ok(params)
}

fn parse_param<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ApiError> {
    value.trim().parse().map_err(|_| {
        ApiError::bad_request(format!(
            "invalid value '{}' for query parameter '{}'",
            value, key
        ))
    })
}

/// GET /book - list books matching any of the supplied filters.
///
/// With no filters at all, every book is returned. Filters combine by
/// union and a book matching several appears once.
pub async fn list(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    Extension(bearer): Extension<Bearer>,
) -> Result<Json<Page<BookResult>>, ApiError> {
    let params = parse_list_params(raw.as_deref())?;

    let books = query::aggregate(state.books.as_ref(), &params.predicates()).await?;
    let results =
        enrich::enrich_books(state.author_directory.as_ref(), books, bearer.header_value()).await;

    Ok(Json(pagination::paginate(
        results,
        params.start,
        params.segment_size,
    )))
}

/// GET /book/:id - single book with its author name resolved.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(bearer): Extension<Bearer>,
) -> Result<Json<BookResult>, ApiError> {
    let book = state
        .books
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No book by id {}", id)))?;

    let author_name = enrich::resolve_author_name(
        state.author_directory.as_ref(),
        book.author_id,
        bearer.header_value(),
    )
    .await;

    Ok(Json(BookResult::from_entity(book, author_name)))
}

/// POST /book - create a book. Admin only.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(bearer): Extension<Bearer>,
    Json(payload): Json<NewBook>,
) -> Result<(StatusCode, Json<BookResult>), ApiError> {
    principal.require_admin()?;

    let book = state.books.create(payload).await?;
    let author_name = enrich::resolve_author_name(
        state.author_directory.as_ref(),
        book.author_id,
        bearer.header_value(),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(BookResult::from_entity(book, author_name)),
    ))
}

/// DELETE /book/:id - remove a book. Admin only.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(principal): Extension<Principal>,
) -> Result<StatusCode, ApiError> {
    principal.require_admin()?;
    state.books.delete(id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_id_params() {
        let params =
            parse_list_params(Some("title=Dune&id=5&id=7&authorId=2&start=0&segmentSize=10"))
                .unwrap();
        assert_eq!(params.title.as_deref(), Some("Dune"));
        assert_eq!(params.ids, vec![5, 7]);
        assert_eq!(params.author_ids, vec![2]);
        assert_eq!(params.start, Some(0));
        assert_eq!(params.segment_size, Some(10));
    }

    #[test]
    fn missing_query_string_means_no_filters() {
        let params = parse_list_params(None).unwrap();
        assert_eq!(params, BookListParams::default());
        assert!(params.predicates().is_empty());
    }

    #[test]
    fn unknown_params_are_ignored() {
        let params = parse_list_params(Some("foo=bar&title=Emma")).unwrap();
        assert_eq!(params.title.as_deref(), Some("Emma"));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let err = parse_list_params(Some("id=abc")).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn url_encoding_is_decoded() {
        let params = parse_list_params(Some("title=War%20and%20Peace")).unwrap();
        assert_eq!(params.title.as_deref(), Some("War and Peace"));
    }

    #[test]
    fn predicates_follow_supplied_params() {
        let params = parse_list_params(Some("title=Dune&id=5")).unwrap();
        let predicates = params.predicates();
        assert_eq!(predicates.len(), 2);
        assert!(predicates.contains(&Predicate::TextMatch("Dune".to_string())));
        assert!(predicates.contains(&Predicate::IdSet(vec![5])));
    }
}
