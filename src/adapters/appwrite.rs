//! Appwrite REST adapter for accounts and user-profile rows.
//!
//! Implements [`AccountService`] and [`ProfileStore`] on top of
//! [`HttpClient`]. Sessions follow the mobile SDK convention: the backend
//! returns the session cookie in an `X-Fallback-Cookies` header, which is
//! sent back on every request and persisted so a restart keeps the user
//! signed in.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::{AccountInfo, UserProfile};
use crate::progress::Progress;
use crate::traits::{
    AccountService, Headers, HttpClient, KeyValueStore, Method, ProfileStore, Response,
};

/// Preference key holding the session cookie.
pub const COOKIE_FALLBACK_KEY: &str = "cookieFallback";

const FALLBACK_COOKIES_HEADER: &str = "X-Fallback-Cookies";

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: u16,
    #[serde(rename = "type", default)]
    kind: String,
}

pub struct AppwriteBackend {
    http: Arc<dyn HttpClient>,
    config: BackendConfig,
    store: Arc<dyn KeyValueStore>,
    /// Cached session cookie. `None` means "not loaded or signed out".
    cookie: Mutex<Option<String>>,
}

impl AppwriteBackend {
    pub fn new(
        http: Arc<dyn HttpClient>,
        config: BackendConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            http,
            config,
            store,
            cookie: Mutex::new(None),
        }
    }

    fn cached_cookie(&self) -> Option<String> {
        self.cookie
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_cached_cookie(&self, cookie: Option<String>) {
        *self.cookie.lock().unwrap_or_else(PoisonError::into_inner) = cookie;
    }

    /// The session cookie, loading it from the preference store on first use.
    async fn session_cookie(&self) -> Option<String> {
        if let Some(cookie) = self.cached_cookie() {
            return Some(cookie);
        }
        match self.store.get(COOKIE_FALLBACK_KEY).await {
            Ok(Some(cookie)) => {
                self.set_cached_cookie(Some(cookie.clone()));
                Some(cookie)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored session: {}", e);
                None
            }
        }
    }

    async fn remember_cookie(&self, response: &Response) -> Result<(), BackendError> {
        if let Some(cookie) = response.header(FALLBACK_COOKIES_HEADER) {
            self.set_cached_cookie(Some(cookie.to_string()));
            self.store.set(COOKIE_FALLBACK_KEY, cookie).await?;
        }
        Ok(())
    }

    async fn forget_cookie(&self) {
        self.set_cached_cookie(None);
        if let Err(e) = self.store.remove(COOKIE_FALLBACK_KEY).await {
            tracing::warn!("Failed to clear stored session: {}", e);
        }
    }

    async fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert(
            "X-Appwrite-Project".to_string(),
            self.config.project_id.clone(),
        );
        if let Some(cookie) = self.session_cookie().await {
            headers.insert(FALLBACK_COOKIES_HEADER.to_string(), cookie);
        }
        headers
    }

    fn rows_path(&self) -> String {
        format!(
            "/tablesdb/{}/tables/{}/rows",
            self.config.database_id, self.config.users_table_id
        )
    }

    fn row_path(&self, row_id: &str) -> String {
        format!("{}/{}", self.rows_path(), urlencoding::encode(row_id))
    }

    /// Send a request and turn non-2xx responses into [`BackendError::Api`].
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, BackendError> {
        let url = format!("{}{}", self.config.endpoint.trim_end_matches('/'), path);
        let body = body.map(|b| b.to_string());
        let headers = self.headers().await;

        let response = self
            .http
            .request(method, &url, body.as_deref(), &headers)
            .await?;
        self.remember_cookie(&response).await?;

        if response.is_success() {
            return Ok(response);
        }

        let error = match response.json::<ApiErrorBody>() {
            Ok(body) => BackendError::Api {
                code: if body.code == 0 { response.status } else { body.code },
                kind: body.kind,
                message: body.message,
            },
            Err(_) => BackendError::Api {
                code: response.status,
                kind: String::new(),
                message: response.status_text().to_string(),
            },
        };
        tracing::debug!(%method, path, error = %error, "backend request failed");
        Err(error)
    }
}

#[async_trait]
impl AccountService for AppwriteBackend {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AccountInfo, BackendError> {
        let body = json!({
            "userId": "unique()",
            "email": email,
            "password": password,
            "name": name,
        });
        let response = self.send(Method::Post, "/account", Some(body)).await?;
        Ok(response.json()?)
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let body = json!({ "email": email, "password": password });
        self.send(Method::Post, "/account/sessions/email", Some(body))
            .await?;
        Ok(())
    }

    async fn current_account(&self) -> Result<Option<AccountInfo>, BackendError> {
        match self.send(Method::Get, "/account", None).await {
            Ok(response) => Ok(Some(response.json()?)),
            // No session (expected when signed out)
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete_current_session(&self) -> Result<(), BackendError> {
        let result = self
            .send(Method::Delete, "/account/sessions/current", None)
            .await;
        self.forget_cookie().await;
        result.map(|_| ())
    }

    async fn create_recovery(&self, email: &str, redirect_url: &str) -> Result<(), BackendError> {
        let body = json!({ "email": email, "url": redirect_url });
        self.send(Method::Post, "/account/recovery", Some(body))
            .await?;
        Ok(())
    }

    async fn update_recovery(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        let body = json!({ "userId": user_id, "secret": secret, "password": password });
        self.send(Method::Put, "/account/recovery", Some(body))
            .await?;
        Ok(())
    }

    async fn disable_account(&self) -> Result<(), BackendError> {
        self.send(Method::Patch, "/account/status", None).await?;
        self.forget_cookie().await;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for AppwriteBackend {
    async fn create_profile(
        &self,
        user_id: &str,
        nickname: &str,
        email: &str,
    ) -> Result<UserProfile, BackendError> {
        let body = json!({
            "rowId": user_id,
            "data": { "nickName": nickname, "email": email },
            "permissions": [
                format!("read(\"user:{}\")", user_id),
                format!("write(\"user:{}\")", user_id),
            ],
        });
        let response = self.send(Method::Post, &self.rows_path(), Some(body)).await?;
        Ok(response.json()?)
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        let response = self.send(Method::Get, &self.row_path(user_id), None).await?;
        Ok(response.json()?)
    }

    async fn update_progress(&self, user_id: &str, progress: Progress) -> Result<(), BackendError> {
        let body = json!({
            "data": {
                "clickCount": progress.click_count,
                "completedGoals": progress.completed_goals,
            }
        });
        self.send(Method::Patch, &self.row_path(user_id), Some(body))
            .await?;
        Ok(())
    }

    async fn delete_profile(&self, user_id: &str) -> Result<(), BackendError> {
        self.send(Method::Delete, &self.row_path(user_id), None)
            .await?;
        Ok(())
    }
}
