//! Payload shapes returned by the recipe-hub API.
//!
//! Everything beyond the listing id is optional here; deciding which
//! fields are required is the normalizer's job.

use serde::Deserialize;

use super::recipe::RecipeId;

/// Response body of the paginated listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawListingPage {
    pub recipes: Vec<RawListingEntry>,
}

/// A lightweight reference to a recipe from the listing endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawListingEntry {
    #[serde(rename = "recipeID")]
    pub recipe_id: RecipeId,
    #[serde(default)]
    pub description: Option<String>,
}

impl RawListingEntry {
    pub fn new(recipe_id: impl Into<RecipeId>, description: Option<&str>) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            description: description.map(str::to_string),
        }
    }
}

/// Full recipe payload from the per-id detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipeDetail {
    #[serde(rename = "recipeID", default)]
    pub recipe_id: Option<RecipeId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prep_minutes: Option<i64>,
    #[serde(default)]
    pub cook_minutes: Option<i64>,
    #[serde(default)]
    pub ready_in_minutes: Option<i64>,
    #[serde(default)]
    pub ingredients: Option<Vec<RawIngredient>>,
    #[serde(default)]
    pub directions: Option<Vec<RawDirection>>,
    #[serde(default)]
    pub footnotes: Option<Vec<RawFootnote>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIngredient {
    #[serde(default)]
    pub display_value: String,
    /// "Normal" for real ingredient lines, something else for headings.
    #[serde(default)]
    pub display_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDirection {
    #[serde(default)]
    pub display_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFootnote {
    #[serde(default)]
    pub text: String,
}
