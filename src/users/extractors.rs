use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo_types::AuthToken;

/// Resolves the opaque bearer token to the owning user's ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let key = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("invalid auth scheme".into()))?;

        let user_id = AuthToken::user_id_for(&state.db, key)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("invalid token".into()))?;

        Ok(AuthUser(user_id))
    }
}
