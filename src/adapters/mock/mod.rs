//! Mock implementations for testing.
//!
//! This module provides mock implementations of all trait abstractions,
//! enabling unit testing without network dependencies or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockBackend`] - Accounts and profile rows kept in memory
//! - [`InMemoryStore`] - In-memory preference storage
//! - [`MockScheduler`] - Records scheduled notifications

pub mod backend;
pub mod http;
pub mod notifications;
pub mod store;

pub use backend::{BackendCall, MockBackend};
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use notifications::MockScheduler;
pub use store::InMemoryStore;
