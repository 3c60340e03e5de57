use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::{AuthToken, User};

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_staff, is_superuser, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_staff, is_superuser, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, is_staff, is_superuser, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Partial profile update; `None` fields keep their stored value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        email: Option<&str>,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, email, name, password_hash, is_staff, is_superuser, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}

impl AuthToken {
    /// Fetch the user's token, creating one with `new_key` on first login.
    /// The no-op update on conflict makes RETURNING yield the existing row,
    /// so concurrent logins settle on the same key.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid, new_key: &str) -> anyhow::Result<AuthToken> {
        let token = sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (token, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET token = auth_tokens.token
            RETURNING token, user_id, created_at
            "#,
        )
        .bind(new_key)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(token)
    }

    /// Resolve a presented token to its owning user, if any.
    pub async fn user_id_for(db: &PgPool, token: &str) -> anyhow::Result<Option<Uuid>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id
            FROM auth_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(user_id)
    }
}
