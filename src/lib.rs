//! GifTree - click through cat gifs to plant trees.
//!
//! This library exposes the app core (fetch controller, progress counter,
//! session, preferences and view models) for the binary and for
//! integration tests.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod notifications;
pub mod progress;
pub mod session;
pub mod theme;
pub mod traits;
pub mod validation;
pub mod view_state;
