//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations used by the providers and backend
//! - [`AccountService`] / [`ProfileStore`] - backend-as-a-service
//! - [`KeyValueStore`] - local string preferences
//! - [`NotificationScheduler`] - daily local reminders

pub mod backend;
pub mod http;
pub mod notifications;
pub mod store;

pub use backend::{AccountService, ProfileStore};
pub use http::{Headers, HttpClient, HttpError, Method, Response};
pub use notifications::{
    DailyTrigger, NotificationContent, NotificationScheduler, PermissionStatus, SchedulerError,
};
pub use store::{KeyValueStore, StoreError};
