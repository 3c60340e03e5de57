use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    extract::AppJson,
    state::AppState,
    tags::{
        dto::{CreateTagRequest, TagResponse, UpdateTagRequest},
        repo_types::Tag,
    },
    users::extractors::AuthUser,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route(
            "/tags/:id",
            get(get_tag).patch(patch_tag).delete(delete_tag),
        )
}

#[instrument(skip(state))]
pub async fn list_tags(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = Tag::list_by_user(&state.db, user_id).await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_tag(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        warn!("blank tag name");
        return Err(ApiError::validation("name", "this field may not be blank"));
    }

    let tag = Tag::insert(&state.db, user_id, &payload.name).await?;
    info!(user_id = %user_id, tag_id = %tag.id, "tag created");
    Ok((StatusCode::CREATED, Json(tag.into())))
}

#[instrument(skip(state))]
pub async fn get_tag(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = Tag::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("tag"))?;
    Ok(Json(tag.into()))
}

#[instrument(skip(state, payload))]
pub async fn patch_tag(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateTagRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::validation("name", "this field may not be blank"));
        }
    }

    let tag = Tag::update(&state.db, user_id, id, payload.name.as_deref())
        .await?
        .ok_or(ApiError::NotFound("tag"))?;

    info!(user_id = %user_id, tag_id = %tag.id, "tag updated");
    Ok(Json(tag.into()))
}

#[instrument(skip(state))]
pub async fn delete_tag(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Tag::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("tag"));
    }
    info!(user_id = %user_id, tag_id = %id, "tag deleted");
    Ok(StatusCode::NO_CONTENT)
}
