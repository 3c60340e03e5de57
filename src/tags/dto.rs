use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tags::repo_types::Tag;

/// Embedded tag descriptor inside recipe payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct TagInput {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Request body for creating a tag directly.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Partial tag update.
#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}
