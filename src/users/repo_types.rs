use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub email: String,              // normalized email
    pub name: String,               // display name
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Opaque credential row. One per user, reused across logins.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}
