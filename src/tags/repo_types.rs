use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Tag row, owned by a single user. Rows outlive the recipes that
/// reference them.
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}
