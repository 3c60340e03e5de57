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
    recipes::{
        dto::{
            CreateRecipeRequest, PatchRecipeRequest, PutRecipeRequest, RecipeDetails,
            RecipeListItem,
        },
        repo_types::Recipe,
        services::set_recipe_tags,
    },
    state::AppState,
    tags::repo_types::Tag,
    users::extractors::AuthUser,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe)
                .put(put_recipe)
                .patch(patch_recipe)
                .delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeListItem>>, ApiError> {
    let recipes = Recipe::list_by_user(&state.db, user_id).await?;
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let mut tag_map = Tag::map_for_recipes(&state.db, &ids).await?;

    let items = recipes
        .into_iter()
        .map(|recipe| {
            let tags = tag_map
                .remove(&recipe.id)
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect();
            RecipeListItem::from_row(recipe, tags)
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetails>, ApiError> {
    let recipe = Recipe::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    let tags = Tag::list_for_recipe(&state.db, recipe.id).await?;
    Ok(Json(RecipeDetails::from_row(
        recipe,
        tags.into_iter().map(Into::into).collect(),
    )))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetails>), ApiError> {
    if payload.title.trim().is_empty() {
        warn!("blank recipe title");
        return Err(ApiError::validation("title", "this field may not be blank"));
    }

    let mut tx = state.db.begin().await?;
    let recipe = Recipe::insert(
        &mut *tx,
        user_id,
        &payload.title,
        &payload.description,
        payload.time_minutes,
        payload.price,
        &payload.link,
    )
    .await?;
    if let Some(descriptors) = &payload.tags {
        set_recipe_tags(&mut tx, user_id, recipe.id, descriptors).await?;
    }
    tx.commit().await?;

    let tags = Tag::list_for_recipe(&state.db, recipe.id).await?;
    info!(user_id = %user_id, recipe_id = %recipe.id, "recipe created");
    Ok((
        StatusCode::CREATED,
        Json(RecipeDetails::from_row(
            recipe,
            tags.into_iter().map(Into::into).collect(),
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn put_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<PutRecipeRequest>,
) -> Result<Json<RecipeDetails>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("title", "this field may not be blank"));
    }

    let mut tx = state.db.begin().await?;
    let recipe = Recipe::update(
        &mut *tx,
        user_id,
        id,
        Some(&payload.title),
        payload.description.as_deref(),
        Some(payload.time_minutes),
        Some(payload.price),
        payload.link.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("recipe"))?;
    if let Some(descriptors) = &payload.tags {
        set_recipe_tags(&mut tx, user_id, recipe.id, descriptors).await?;
    }
    tx.commit().await?;

    let tags = Tag::list_for_recipe(&state.db, recipe.id).await?;
    info!(user_id = %user_id, recipe_id = %recipe.id, "recipe replaced");
    Ok(Json(RecipeDetails::from_row(
        recipe,
        tags.into_iter().map(Into::into).collect(),
    )))
}

#[instrument(skip(state, payload))]
pub async fn patch_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<PatchRecipeRequest>,
) -> Result<Json<RecipeDetails>, ApiError> {
    if let Some(title) = payload.title.as_deref() {
        if title.trim().is_empty() {
            return Err(ApiError::validation("title", "this field may not be blank"));
        }
    }

    let mut tx = state.db.begin().await?;
    let recipe = Recipe::update(
        &mut *tx,
        user_id,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.time_minutes,
        payload.price,
        payload.link.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("recipe"))?;
    if let Some(descriptors) = &payload.tags {
        set_recipe_tags(&mut tx, user_id, recipe.id, descriptors).await?;
    }
    tx.commit().await?;

    let tags = Tag::list_for_recipe(&state.db, recipe.id).await?;
    info!(user_id = %user_id, recipe_id = %recipe.id, "recipe updated");
    Ok(Json(RecipeDetails::from_row(
        recipe,
        tags.into_iter().map(Into::into).collect(),
    )))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Recipe::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("recipe"));
    }
    info!(user_id = %user_id, recipe_id = %id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
