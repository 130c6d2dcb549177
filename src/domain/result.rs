//! Result type alias for Tamiz

use super::errors::TamizError;

/// Result type alias using `TamizError` as the error type.
///
/// Used throughout the crate for fallible infrastructure operations.
/// Note that row rejections are not errors: the transformer returns
/// `std::result::Result<_, RejectedRow>` where the `Err` arm is data.
pub type Result<T> = std::result::Result<T, TamizError>;
