//! The /user_book resource: per-user reading lists.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::Principal;
use crate::database::models::{NewUserBook, UserBook};
use crate::error::ApiError;
use crate::pagination::{self, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookListQuery {
    pub start: Option<i64>,
    pub segment_size: Option<i64>,
}

/// GET /user_book/:user_id - list a user's books.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(params): Query<UserBookListQuery>,
) -> Result<Json<Page<UserBook>>, ApiError> {
    let mut entries = state.user_books.list_for_user(user_id).await?;
    entries.sort_by_key(|entry| entry.id);

    Ok(Json(pagination::paginate(
        entries,
        params.start,
        params.segment_size,
    )))
}

/// GET /user_book/:user_id/:id
pub async fn get(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(i32, i32)>,
) -> Result<Json<UserBook>, ApiError> {
    let entry = state.user_books.get(user_id, id).await?.ok_or_else(|| {
        ApiError::not_found(format!("No user book by id {} for user {}", id, user_id))
    })?;
    Ok(Json(entry))
}

/// POST /user_book/:user_id - add a book to a user's list. Admin only.
pub async fn create(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewUserBook>,
) -> Result<(StatusCode, Json<UserBook>), ApiError> {
    principal.require_admin()?;
    let entry = state.user_books.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /user_book/:user_id/:id - remove a book from a user's list. Admin only.
pub async fn delete(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(i32, i32)>,
    Extension(principal): Extension<Principal>,
) -> Result<StatusCode, ApiError> {
    principal.require_admin()?;
    state.user_books.delete(user_id, id).await?;
    Ok(StatusCode::OK)
}
