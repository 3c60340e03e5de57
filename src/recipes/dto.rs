use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recipes::repo_types::Recipe;
use crate::tags::dto::{TagInput, TagResponse};

/// List body; `description` only appears in the detail body.
#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<TagResponse>,
}

impl RecipeListItem {
    pub fn from_row(recipe: Recipe, tags: Vec<TagResponse>) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<TagResponse>,
}

impl RecipeDetails {
    pub fn from_row(recipe: Recipe, tags: Vec<TagResponse>) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags,
        }
    }
}

/// Unknown keys (notably `user`) are dropped by serde, which is what makes
/// owner reassignment through the payload a silent no-op.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    pub tags: Option<Vec<TagInput>>,
}

/// PATCH body; absent keys leave the column untouched. A present `tags` key
/// replaces the association set, `[]` included.
#[derive(Debug, Deserialize)]
pub struct PatchRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<TagInput>>,
}

/// PUT body; the scalar fields are mandatory, `tags` still distinguishes
/// absent (keep) from empty (clear).
#[derive(Debug, Deserialize)]
pub struct PutRecipeRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<TagInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_tags_key_deserializes_to_none() {
        let req: PatchRecipeRequest =
            serde_json::from_value(json!({ "title": "Curry" })).unwrap();
        assert!(req.tags.is_none());
    }

    #[test]
    fn empty_tags_list_is_present_and_empty() {
        let req: PatchRecipeRequest = serde_json::from_value(json!({ "tags": [] })).unwrap();
        let tags = req.tags.expect("tags key present");
        assert!(tags.is_empty());
    }

    #[test]
    fn user_key_in_payload_is_ignored() {
        let req: PatchRecipeRequest = serde_json::from_value(json!({
            "title": "Curry",
            "user": "2f1b9c1e-0000-0000-0000-000000000000"
        }))
        .unwrap();
        assert_eq!(req.title.as_deref(), Some("Curry"));
    }

    #[test]
    fn price_accepts_number_and_string() {
        let from_number: CreateRecipeRequest = serde_json::from_value(json!({
            "title": "Sample recipe",
            "time_minutes": 30,
            "price": 5.99
        }))
        .unwrap();
        let from_string: CreateRecipeRequest = serde_json::from_value(json!({
            "title": "Sample recipe",
            "time_minutes": 30,
            "price": "5.99"
        }))
        .unwrap();
        assert_eq!(from_string.price.to_string(), "5.99");
        assert_eq!(from_number.price.round_dp(2), from_string.price);
    }

    #[test]
    fn create_defaults_description_and_link_to_empty() {
        let req: CreateRecipeRequest = serde_json::from_value(json!({
            "title": "Sample recipe",
            "time_minutes": 30,
            "price": "5.25"
        }))
        .unwrap();
        assert_eq!(req.description, "");
        assert_eq!(req.link, "");
        assert!(req.tags.is_none());
    }

    #[test]
    fn put_requires_scalar_fields() {
        let missing_price = serde_json::from_value::<PutRecipeRequest>(json!({
            "title": "Sample recipe",
            "time_minutes": 30
        }));
        assert!(missing_price.is_err());
    }

    #[test]
    fn detail_serializes_nested_tags() {
        let details = RecipeDetails {
            id: Uuid::new_v4(),
            title: "Bi Bim Bop".into(),
            description: "rice bowl".into(),
            time_minutes: 30,
            price: Decimal::new(250, 2),
            link: String::new(),
            tags: vec![TagResponse {
                id: Uuid::new_v4(),
                name: "Korean".into(),
            }],
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["tags"][0]["name"], "Korean");
        assert_eq!(value["price"], "2.50");
    }
}
