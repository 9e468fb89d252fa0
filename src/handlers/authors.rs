//! The /author resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::Principal;
use crate::database::models::{Author, NewAuthor};
use crate::error::ApiError;
use crate::pagination::{self, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorListQuery {
    pub name: Option<String>,
    pub start: Option<i64>,
    pub segment_size: Option<i64>,
}

/// GET /author - list authors, optionally narrowed by name or partial name.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AuthorListQuery>,
) -> Result<Json<Page<Author>>, ApiError> {
    let mut authors = match &params.name {
        Some(name) => state.authors.find_by_name(name).await?,
        None => state.authors.find_all().await?,
    };
    authors.sort();

    Ok(Json(pagination::paginate(
        authors,
        params.start,
        params.segment_size,
    )))
}

/// GET /author/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Author>, ApiError> {
    let author = state
        .authors
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No author by id {}", id)))?;
    Ok(Json(author))
}

/// POST /author - create an author. Admin only.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewAuthor>,
) -> Result<(StatusCode, Json<Author>), ApiError> {
    principal.require_admin()?;
    let author = state.authors.create(payload).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// DELETE /author/:id - remove an author. Admin only.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(principal): Extension<Principal>,
) -> Result<StatusCode, ApiError> {
    principal.require_admin()?;
    state.authors.delete(id).await?;
    Ok(StatusCode::OK)
}
