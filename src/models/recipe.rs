use serde::{Deserialize, Serialize};
use std::fmt;

/// Recipe identifier as handed out by the hub: either a number or a string.
///
/// The two forms are kept distinct, so `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeId::Number(n) => write!(f, "{}", n),
            RecipeId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecipeId {
    fn from(n: i64) -> Self {
        RecipeId::Number(n)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        RecipeId::Text(s.to_string())
    }
}

impl RecipeId {
    /// Matches an id typed on the command line against this id.
    ///
    /// Numeric ids match their decimal form; text ids match exactly.
    pub fn matches(&self, input: &str) -> bool {
        match self {
            RecipeId::Number(n) => input.trim().parse::<i64>().ok() == Some(*n),
            RecipeId::Text(s) => s == input,
        }
    }
}

/// Canonical recipe record as written to the dataset file.
///
/// Field order here is the serialized field order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub prep_minutes: u32,
    pub cook_minutes: u32,
    pub ready_in_minutes: u32,
    pub ingredients: Vec<String>,
    pub directions: Vec<String>,
    pub footnotes: Vec<String>,
}

impl RecipeRecord {
    pub fn new(id: impl Into<RecipeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            prep_minutes: 0,
            cook_minutes: 0,
            ready_in_minutes: 0,
            ingredients: Vec::new(),
            directions: Vec::new(),
            footnotes: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_times(mut self, prep: u32, cook: u32, ready_in: u32) -> Self {
        self.prep_minutes = prep;
        self.cook_minutes = cook;
        self.ready_in_minutes = ready_in;
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_directions(mut self, directions: Vec<String>) -> Self {
        self.directions = directions;
        self
    }

    pub fn with_footnotes(mut self, footnotes: Vec<String>) -> Self {
        self.footnotes = footnotes;
        self
    }
}

impl fmt::Display for RecipeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;

        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }

        writeln!(
            f,
            "\nTime: {} min (prep: {} min, cook: {} min)",
            self.ready_in_minutes, self.prep_minutes, self.cook_minutes
        )?;

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        if !self.directions.is_empty() {
            writeln!(f, "\nDirections:")?;
            for (i, step) in self.directions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, step)?;
            }
        }

        if !self.footnotes.is_empty() {
            writeln!(f, "\nNotes:")?;
            for note in &self.footnotes {
                writeln!(f, "  * {}", note)?;
            }
        }

        Ok(())
    }
}
