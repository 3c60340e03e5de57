use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::tags::dto::TagInput;
use crate::tags::repo_types::Tag;

/// Resolve `{name}` descriptors into tag rows owned by `user_id` and make
/// them the recipe's complete association set. Names without a matching row
/// get one created; repeated names collapse onto the same row.
///
/// Runs inside the recipe write's transaction so a failed write leaves no
/// stray tags behind.
pub async fn set_recipe_tags(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    recipe_id: Uuid,
    descriptors: &[TagInput],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut **tx)
        .await?;

    for descriptor in descriptors {
        let tag = match Tag::find_by_name(&mut **tx, user_id, &descriptor.name).await? {
            Some(tag) => tag,
            None => {
                debug!(user_id = %user_id, name = %descriptor.name, "creating tag on write");
                Tag::insert(&mut **tx, user_id, &descriptor.name).await?
            }
        };

        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(tag.id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
