use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::recipes::repo_types::Recipe;

impl Recipe {
    /// Caller's recipes, newest first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, time_minutes, price, link, created_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, time_minutes, price, link, created_at
            FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        db: E,
        user_id: Uuid,
        title: &str,
        description: &str,
        time_minutes: i32,
        price: Decimal,
        link: &str,
    ) -> anyhow::Result<Recipe>
    where
        E: PgExecutor<'e>,
    {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (user_id, title, description, time_minutes, price, link)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, time_minutes, price, link, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(time_minutes)
        .bind(price)
        .bind(link)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    /// Owner-scoped column update; `None` fields keep their stored value.
    /// Returns `None` when the row is missing or owned by someone else.
    #[allow(clippy::too_many_arguments)]
    pub async fn update<'e, E>(
        db: E,
        user_id: Uuid,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        time_minutes: Option<i32>,
        price: Option<Decimal>,
        link: Option<&str>,
    ) -> anyhow::Result<Option<Recipe>>
    where
        E: PgExecutor<'e>,
    {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                time_minutes = COALESCE($5, time_minutes),
                price = COALESCE($6, price),
                link = COALESCE($7, link)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, time_minutes, price, link, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(time_minutes)
        .bind(price)
        .bind(link)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    /// Owner-scoped delete; association rows cascade, tag rows stay.
    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
