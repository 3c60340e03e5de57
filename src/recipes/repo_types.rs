use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Recipe row. The owner reference is set at insert time and never
/// updated afterwards.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub created_at: OffsetDateTime,
}
