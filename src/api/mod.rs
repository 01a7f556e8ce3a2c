//! Clients for the cat-image and plant-data providers.
//!
//! Both providers are plain JSON GET endpoints. A non-2xx status becomes
//! [`ApiError::Status`] carrying the status text.

mod cat;
mod trees;

pub use cat::CatApi;
pub use trees::{TreeApi, DEFAULT_TREE_QUERY};

use crate::error::ApiError;
use crate::traits::{Headers, HttpClient};

/// Headers sent with every provider request.
pub fn default_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("accept".to_string(), "application/json".to_string());
    headers
}

/// GET `url` and decode a JSON body.
pub(crate) async fn get_json<T>(http: &dyn HttpClient, url: &str) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let response = http.get(url, &default_headers()).await?;

    if !response.is_success() {
        tracing::warn!(status = response.status, "provider request failed");
        return Err(ApiError::Status {
            status: response.status,
            status_text: response.status_text().to_string(),
        });
    }

    Ok(response.json()?)
}
