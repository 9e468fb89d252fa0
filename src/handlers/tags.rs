//! The /tag resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::Principal;
use crate::database::models::{NewTag, Tag};
use crate::error::ApiError;
use crate::pagination::{self, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagListQuery {
    pub start: Option<i64>,
    pub segment_size: Option<i64>,
}

/// GET /tag - list all tags.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TagListQuery>,
) -> Result<Json<Page<Tag>>, ApiError> {
    let mut tags = state.tags.find_all().await?;
    tags.sort();

    Ok(Json(pagination::paginate(
        tags,
        params.start,
        params.segment_size,
    )))
}

/// GET /tag/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state
        .tags
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No tag by id {}", id)))?;
    Ok(Json(tag))
}

/// POST /tag - create a tag. Admin only. Tag names are unique, so a
/// duplicate name comes back as 409.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewTag>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    principal.require_admin()?;
    let tag = state.tags.create(payload).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// DELETE /tag/:id - remove a tag. Admin only.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(principal): Extension<Principal>,
) -> Result<StatusCode, ApiError> {
    principal.require_admin()?;
    state.tags.delete(id).await?;
    Ok(StatusCode::OK)
}
