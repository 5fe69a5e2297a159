//! Conversion from raw hub payloads to [`RecipeRecord`]s.

use thiserror::Error;

use crate::models::{RawDirection, RawFootnote, RawIngredient, RawRecipeDetail, RecipeRecord};

/// `displayType` of ingredient lines that are real ingredients.
const NORMAL_DISPLAY_TYPE: &str = "Normal";

/// A detail payload that cannot become a [`RecipeRecord`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Malformed recipe record: missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Malformed recipe record: field '{field}' must be non-negative, got {value}")]
    NegativeMinutes { field: &'static str, value: i64 },
}

/// Keeps "Normal" ingredient lines, dropping section headers and annotations.
pub fn normalize_ingredients(raw: &[RawIngredient]) -> Vec<String> {
    raw.iter()
        .filter(|i| i.display_type == NORMAL_DISPLAY_TYPE)
        .map(|i| i.display_value.clone())
        .collect()
}

pub fn normalize_directions(raw: &[RawDirection]) -> Vec<String> {
    raw.iter().map(|d| d.display_value.clone()).collect()
}

pub fn normalize_footnotes(raw: &[RawFootnote]) -> Vec<String> {
    raw.iter().map(|n| n.text.clone()).collect()
}

/// Builds a record from one detail payload.
///
/// `override_description` comes from the listing entry that referenced the
/// recipe and wins over the detail's own description when present.
pub fn normalize_recipe(
    raw: &RawRecipeDetail,
    override_description: Option<&str>,
) -> Result<RecipeRecord, NormalizeError> {
    let id = raw
        .recipe_id
        .clone()
        .ok_or(NormalizeError::MissingField("recipeID"))?;
    let title = raw
        .title
        .clone()
        .ok_or(NormalizeError::MissingField("title"))?;

    let prep_minutes = minutes(raw.prep_minutes, "prepMinutes")?;
    let cook_minutes = minutes(raw.cook_minutes, "cookMinutes")?;
    let ready_in_minutes = minutes(raw.ready_in_minutes, "readyInMinutes")?;

    let description = match override_description {
        Some(d) => d.to_string(),
        None => raw.description.clone().unwrap_or_default(),
    };

    Ok(RecipeRecord {
        id,
        title,
        description,
        prep_minutes,
        cook_minutes,
        ready_in_minutes,
        ingredients: normalize_ingredients(raw.ingredients.as_deref().unwrap_or_default()),
        directions: normalize_directions(raw.directions.as_deref().unwrap_or_default()),
        footnotes: normalize_footnotes(raw.footnotes.as_deref().unwrap_or_default()),
    })
}

fn minutes(value: Option<i64>, field: &'static str) -> Result<u32, NormalizeError> {
    let value = value.ok_or(NormalizeError::MissingField(field))?;
    u32::try_from(value).map_err(|_| NormalizeError::NegativeMinutes { field, value })
}
