//! Result type alias for GifTree operations.

use super::giftree_error::GifTreeError;

/// Type alias for Results using GifTreeError.
pub type GifTreeResult<T> = Result<T, GifTreeError>;
