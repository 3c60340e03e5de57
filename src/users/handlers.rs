use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    extract::AppJson,
    state::AppState,
    users::{
        dto::{PublicUser, RegisterRequest, TokenRequest, TokenResponse, UpdateMeRequest},
        extractors::AuthUser,
        repo_types::{AuthToken, User},
        services::{
            generate_token_key, hash_password, is_valid_email, normalize_email, verify_password,
            PASSWORD_MIN_LEN,
        },
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(register))
        .route("/token", post(token))
        .route("/me", get(get_me).patch(update_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("email", "enter a valid email address"));
    }

    if payload.password.len() < PASSWORD_MIN_LEN {
        warn!("password too short");
        return Err(ApiError::validation(
            "password",
            format!("ensure this field has at least {PASSWORD_MIN_LEN} characters"),
        ));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::validation("email", "email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.email, &payload.name, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn token(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);

    if payload.password.is_empty() {
        warn!("blank password");
        return Err(ApiError::validation("password", "this field may not be blank"));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::BadRequest(
                "unable to authenticate with provided credentials".into(),
            ));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::BadRequest(
            "unable to authenticate with provided credentials".into(),
        ));
    }

    let token = AuthToken::get_or_create(&state.db, user.id, &generate_token_key()).await?;

    info!(user_id = %user.id, "token issued");
    Ok(Json(TokenResponse { token: token.token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;

    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<UpdateMeRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let email = match payload.email.as_deref() {
        Some(raw) => {
            let email = normalize_email(raw);
            if !is_valid_email(&email) {
                return Err(ApiError::validation("email", "enter a valid email address"));
            }
            if let Some(existing) = User::find_by_email(&state.db, &email).await? {
                if existing.id != user_id {
                    return Err(ApiError::validation("email", "email already registered"));
                }
            }
            Some(email)
        }
        None => None,
    };

    let password_hash = match payload.password.as_deref() {
        Some(plain) => {
            if plain.len() < PASSWORD_MIN_LEN {
                return Err(ApiError::validation(
                    "password",
                    format!("ensure this field has at least {PASSWORD_MIN_LEN} characters"),
                ));
            }
            Some(hash_password(plain)?)
        }
        None => None,
    };

    let user = User::update(
        &state.db,
        user_id,
        email.as_deref(),
        payload.name.as_deref(),
        password_hash.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user.into()))
}
