use std::collections::HashMap;

use sqlx::{FromRow, PgExecutor, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tags::repo_types::Tag;

impl Tag {
    /// Caller's tags, reverse-name order.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE user_id = $1
            ORDER BY name DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(tag)
    }

    /// Lookup by name within the owner's tags. Duplicate names are tolerated;
    /// the oldest row wins.
    pub async fn find_by_name<'e, E>(db: E, user_id: Uuid, name: &str) -> anyhow::Result<Option<Tag>>
    where
        E: PgExecutor<'e>,
    {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE user_id = $1 AND name = $2
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(tag)
    }

    pub async fn insert<'e, E>(db: E, user_id: Uuid, name: &str) -> anyhow::Result<Tag>
    where
        E: PgExecutor<'e>,
    {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(tag)
    }

    /// Owner-scoped rename; `None` keeps the stored name.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        name: Option<&str>,
    ) -> anyhow::Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET name = COALESCE($3, name)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(tag)
    }

    /// Owner-scoped delete; false when the row is missing or foreign.
    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tags
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tags associated with one recipe, name order.
    pub async fn list_for_recipe(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.user_id, t.name, t.created_at
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(recipe_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Association sets for a batch of recipes, one query.
    pub async fn map_for_recipes(
        db: &PgPool,
        recipe_ids: &[Uuid],
    ) -> anyhow::Result<HashMap<Uuid, Vec<Tag>>> {
        #[derive(FromRow)]
        struct Row {
            recipe_id: Uuid,
            id: Uuid,
            user_id: Uuid,
            name: String,
            created_at: OffsetDateTime,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT rt.recipe_id, t.id, t.user_id, t.name, t.created_at
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(db)
        .await?;

        let mut map: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in rows {
            map.entry(row.recipe_id).or_default().push(Tag {
                id: row.id,
                user_id: row.user_id,
                name: row.name,
                created_at: row.created_at,
            });
        }
        Ok(map)
    }
}
