//! Cat-image provider.

use std::sync::Arc;

use super::get_json;
use crate::error::ApiError;
use crate::models::CatGifResponse;
use crate::traits::HttpClient;

/// Client for the endpoint that returns a random cat gif as `{ "url": ... }`.
#[derive(Clone)]
pub struct CatApi {
    http: Arc<dyn HttpClient>,
    endpoint: String,
}

impl CatApi {
    pub fn new(http: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_cat_gif(&self) -> Result<CatGifResponse, ApiError> {
        get_json(self.http.as_ref(), &self.endpoint).await
    }
}
