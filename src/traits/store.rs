//! Local key-value preference store abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Preference store errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("No home directory available")]
    NoHomeDirectory,
}

/// String-keyed, string-valued persistent storage.
///
/// Used for the theme preference, the daily reminder preference and the
/// backend session cookie.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
