//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`AppwriteBackend`] - Accounts and profile rows over the backend REST API
//! - [`FilePreferenceStore`] - Preferences in a JSON file under the home directory
//! - [`LocalNotificationScheduler`] - Daily desktop notifications
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for all adapters:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockBackend`] - In-memory accounts and profiles
//! - [`mock::InMemoryStore`] - In-memory preferences
//! - [`mock::MockScheduler`] - Recorded notification schedules

pub mod appwrite;
pub mod file_store;
pub mod local_notifications;
pub mod mock;
pub mod reqwest_http;

pub use appwrite::{AppwriteBackend, COOKIE_FALLBACK_KEY};
pub use file_store::FilePreferenceStore;
pub use local_notifications::LocalNotificationScheduler;
pub use mock::{InMemoryStore, MockBackend, MockHttpClient, MockScheduler};
pub use reqwest_http::ReqwestHttpClient;
