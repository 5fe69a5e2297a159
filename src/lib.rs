//! Recipe Hub archiver
//!
//! Pages through a recipe-hub API, normalizes recipe payloads into a stable
//! record shape and merges them into a local JSON dataset, checkpointing
//! after every page so an interrupted run can be resumed from its output.

pub mod hub;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod store;

pub use hub::{HubClient, HubEndpoints, RecipeSource, RemoteError};
pub use merge::{merge_recipes, HaltReason, MergeError, MergeOptions, MergeSummary};
pub use models::{Dataset, KnownIds, RecipeId, RecipeRecord, DATA_SOURCE, DATA_VERSION};
pub use normalize::{
    normalize_directions, normalize_footnotes, normalize_ingredients, normalize_recipe,
    NormalizeError,
};
pub use store::StoreError;
