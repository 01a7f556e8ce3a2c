//! Plant-data provider.

use std::sync::Arc;

use super::get_json;
use crate::error::ApiError;
use crate::models::TreesApiResponse;
use crate::traits::HttpClient;

/// Query used by the trees screen.
pub const DEFAULT_TREE_QUERY: &str = "tree";

/// Client for `GET {base}/plants/search`.
#[derive(Clone)]
pub struct TreeApi {
    http: Arc<dyn HttpClient>,
    base_url: String,
    token: String,
}

impl TreeApi {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn search_url(&self, query: &str, limit: u32) -> String {
        format!(
            "{}/plants/search?token={}&q={}&limit={}",
            self.base_url,
            urlencoding::encode(&self.token),
            urlencoding::encode(query),
            limit
        )
    }

    /// Search plants matching `query`, returning at most `limit` records.
    pub async fn fetch_tree_data(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<TreesApiResponse, ApiError> {
        let url = self.search_url(query, limit);
        tracing::debug!(query, limit, "searching plants");
        get_json(self.http.as_ref(), &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::{Method, Response};

    fn api(mock: &MockHttpClient) -> TreeApi {
        TreeApi::new(Arc::new(mock.clone()), "http://plants.test/api/v1/", "tok")
    }

    #[test]
    fn test_search_url_encodes_query() {
        let mock = MockHttpClient::new();
        assert_eq!(
            api(&mock).search_url("red oak", 5),
            "http://plants.test/api/v1/plants/search?token=tok&q=red%20oak&limit=5"
        );
    }

    #[tokio::test]
    async fn test_fetch_tree_data() {
        let mock = MockHttpClient::new();
        mock.set_response(
            Method::Get,
            "http://plants.test/api/v1/plants/search",
            MockResponse::Success(Response::json_body(&serde_json::json!({
                "data": [{
                    "id": 1,
                    "common_name": "Oak",
                    "status": "accepted",
                    "family": "Fagaceae",
                    "genus": "Quercus"
                }]
            }))),
        );

        let trees = api(&mock).fetch_tree_data("oak", 5).await.unwrap();
        assert_eq!(trees.data.len(), 1);
        assert_eq!(trees.data[0].display_name(), "Oak");

        let url = &mock.get_requests()[0].url;
        assert!(url.contains("q=oak"));
        assert!(url.contains("limit=5"));
    }

    #[tokio::test]
    async fn test_zero_limit() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::json_body(
            &serde_json::json!({ "data": [] }),
        )));

        let trees = api(&mock).fetch_tree_data(DEFAULT_TREE_QUERY, 0).await.unwrap();
        assert!(trees.data.is_empty());
        assert!(mock.get_requests()[0].url.contains("limit=0"));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(500, "")));

        let err = api(&mock).fetch_tree_data("tree", 1).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Network response was not ok: Internal Server Error"
        );
    }
}
