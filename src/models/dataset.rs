use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::recipe::{RecipeId, RecipeRecord};

/// Current dataset format version.
pub const DATA_VERSION: u32 = 0;

/// Origin label written into every dataset envelope.
pub const DATA_SOURCE: &str = "http://allrecipes.com";

/// Versioned envelope persisted as the output file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub version: u32,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub recipes: Vec<RecipeRecord>,
}

fn default_source() -> String {
    DATA_SOURCE.to_string()
}

impl Dataset {
    /// Creates an empty dataset at the current version.
    pub fn new() -> Self {
        Self {
            version: DATA_VERSION,
            source: DATA_SOURCE.to_string(),
            recipes: Vec::new(),
        }
    }

    pub fn with_recipes(mut self, recipes: Vec<RecipeRecord>) -> Self {
        self.recipes = recipes;
        self
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Finds a recipe by an id typed on the command line.
    pub fn find(&self, input: &str) -> Option<&RecipeRecord> {
        self.recipes.iter().find(|r| r.id.matches(input))
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids already present in the working dataset.
///
/// Derived from the dataset at the start of a run and never persisted.
#[derive(Debug, Clone, Default)]
pub struct KnownIds(HashSet<RecipeId>);

impl KnownIds {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self(dataset.recipes.iter().map(|r| r.id.clone()).collect())
    }

    pub fn contains(&self, id: &RecipeId) -> bool {
        self.0.contains(id)
    }

    /// Returns false if the id was already known.
    pub fn insert(&mut self, id: RecipeId) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
