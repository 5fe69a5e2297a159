//! HTTP client for the recipe-hub API.
//!
//! The API is consumed with async `reqwest`, driven to completion on a
//! private current-thread runtime so each call blocks like a plain function.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;

use super::{RecipeSource, RemoteError};
use crate::models::{RawListingEntry, RawListingPage, RawRecipeDetail, RecipeId};

pub const DEFAULT_LISTING_URL: &str = "https://apps.allrecipes.com/v1/recipe-hubs/1/recipes";
pub const DEFAULT_DETAIL_URL: &str = "https://apps.allrecipes.com/v1/recipes/{id}";

/// Placeholder in the detail URL template replaced by the recipe id.
const ID_PLACEHOLDER: &str = "{id}";

/// Listing and detail endpoint locations.
#[derive(Debug, Clone, PartialEq)]
pub struct HubEndpoints {
    pub listing_url: String,
    /// Template containing `{id}`
    pub detail_url: String,
}

impl Default for HubEndpoints {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            detail_url: DEFAULT_DETAIL_URL.to_string(),
        }
    }
}

/// Blocking client for the recipe hub.
///
/// The credential is fixed at construction and sent with every request.
pub struct HubClient {
    endpoints: HubEndpoints,
    authorization: String,
    http: reqwest::Client,
    runtime: Runtime,
}

impl HubClient {
    /// Creates a client that authenticates with `bearer`.
    ///
    /// A bare token is sent as `Bearer <token>`; a full `Bearer ...` header
    /// value is sent unchanged.
    pub fn new(endpoints: HubEndpoints, bearer: &str) -> Result<Self, RemoteError> {
        Self::with_http(endpoints, bearer, reqwest::Client::new())
    }

    fn with_http(
        endpoints: HubEndpoints,
        bearer: &str,
        http: reqwest::Client,
    ) -> Result<Self, RemoteError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RemoteError::Runtime(e.to_string()))?;

        Ok(Self {
            endpoints,
            authorization: authorization_value(bearer),
            http,
            runtime,
        })
    }

    /// Builds the detail URL for a recipe id.
    fn detail_url(&self, id: &RecipeId) -> String {
        build_detail_url(&self.endpoints.detail_url, id)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        self.runtime.block_on(async {
            let response = self
                .http
                .get(url)
                .query(query)
                .header(AUTHORIZATION, self.authorization.as_str())
                .send()
                .await
                .map_err(|e| RemoteError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            response.json::<T>().await.map_err(|e| RemoteError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
        })
    }
}

impl RecipeSource for HubClient {
    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        sort_type: &str,
    ) -> Result<Vec<RawListingEntry>, RemoteError> {
        tracing::debug!(page, page_size, sort_type, "Requesting listing page");

        let query = [
            ("page", page.to_string()),
            ("pagesize", page_size.to_string()),
            ("sorttype", sort_type.to_string()),
        ];
        let listing: RawListingPage = self.get_json(&self.endpoints.listing_url, &query)?;

        tracing::debug!("Listing page {} has {} entries", page, listing.recipes.len());
        Ok(listing.recipes)
    }

    fn fetch_detail(&self, id: &RecipeId) -> Result<RawRecipeDetail, RemoteError> {
        let url = self.detail_url(id);
        tracing::debug!(%id, "Requesting recipe detail");
        self.get_json(&url, &[])
    }
}

/// Substitutes a URL-encoded id into a detail URL template.
///
/// Templates without `{id}` get the id appended as a final path segment.
fn build_detail_url(template: &str, id: &RecipeId) -> String {
    let encoded = urlencoding::encode(&id.to_string()).into_owned();
    if template.contains(ID_PLACEHOLDER) {
        template.replace(ID_PLACEHOLDER, &encoded)
    } else {
        format!("{}/{}", template.trim_end_matches('/'), encoded)
    }
}

fn authorization_value(bearer: &str) -> String {
    let bearer = bearer.trim();
    if bearer.starts_with("Bearer ") {
        bearer.to_string()
    } else {
        format!("Bearer {}", bearer)
    }
}
