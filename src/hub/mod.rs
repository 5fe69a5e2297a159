//! Access to the remote recipe collection.
//!
//! [`RecipeSource`] is the seam the merge loop is written against;
//! [`HubClient`] is the HTTP implementation used by the CLI.

mod client;
mod error;

pub use client::{HubClient, HubEndpoints, DEFAULT_DETAIL_URL, DEFAULT_LISTING_URL};
pub use error::RemoteError;

use crate::models::{RawListingEntry, RawRecipeDetail, RecipeId};

/// Sort order the listing is paged in unless configured otherwise.
pub const DEFAULT_SORT_TYPE: &str = "Popular";

/// A paginated collection of recipes.
///
/// Calls block until they complete, are never retried, and keep no state
/// between calls.
pub trait RecipeSource {
    /// Returns the listing entries on one page.
    ///
    /// An empty page is not an error; a non-success response is.
    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        sort_type: &str,
    ) -> Result<Vec<RawListingEntry>, RemoteError>;

    /// Returns the full payload for one recipe.
    fn fetch_detail(&self, id: &RecipeId) -> Result<RawRecipeDetail, RemoteError>;
}
