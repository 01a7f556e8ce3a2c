//! View models for the app screens.
//!
//! Each view owns the controllers and flags its screen needs and exposes
//! the strings the renderer shows. Rendering itself lives outside this crate.
//!
//! ## Components
//!
//! - [`HomeView`]: cat gifs and the click progress bar
//! - [`TreesView`]: the list of earned trees and the details modal
//! - [`DeleteAccountFlow`]: nickname-confirmed account deletion

pub mod delete_account;
pub mod home;
pub mod trees;

pub use delete_account::{DeleteAccountFlow, DeleteOutcome, NICKNAME_MISMATCH};
pub use home::{format_thousands, HomeView, PROGRESS_TITLE};
pub use trees::{planted_summary, TreesView, EMPTY_TEXT};
