mod dataset;
mod raw;
mod recipe;

pub use dataset::{Dataset, KnownIds, DATA_SOURCE, DATA_VERSION};
pub use raw::{
    RawDirection, RawFootnote, RawIngredient, RawListingEntry, RawListingPage, RawRecipeDetail,
};
pub use recipe::{RecipeId, RecipeRecord};
