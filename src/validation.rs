//! Request parameter validation.
//!
//! Runs before any filesystem access. There are two entry points that are
//! deliberately independent of each other:
//!
//! - **Raw strings** from the query string: [`validate_identifier`] and
//!   [`validate_dimension`]. The HTTP layer calls these first.
//! - **Typed parameters** inside the orchestrator: [`validate_params`]. This
//!   does not reuse the character-class check; it looks for path separators
//!   and `..` directly, so a caller that skips the raw-string checks still
//!   cannot escape the source or cache directory.
//!
//! ## Identifiers
//!
//! - `"fjord"`, `"my_photo-2"` → accepted
//! - `""`, `"test.jpg"`, `"../test"`, `"a/b"`, `"a\\b"`, `"test image"`, `"a@b"` → rejected
//!
//! ## Dimensions
//!
//! Only well-formed base-10 integers in `1..=5000` are accepted. Decimals are
//! rejected even when they have an exact integer value (`"100.0"`), as are
//! exponents, signs and surrounding whitespace.

use crate::error::{ServiceError, ServiceResult};
use std::fmt;

/// Smallest accepted width or height in pixels.
pub const MIN_DIMENSION: u32 = 1;

/// Largest accepted width or height in pixels.
pub const MAX_DIMENSION: u32 = 5000;

/// A width or height in pixels, known to be within
/// [`MIN_DIMENSION`]`..=`[`MAX_DIMENSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dimension(u32);

impl Dimension {
    pub fn new(value: u32) -> Option<Self> {
        (MIN_DIMENSION..=MAX_DIMENSION)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn has_path_syntax(s: &str) -> bool {
    s.contains("..") || s.contains('/') || s.contains('\\')
}

/// Check that `raw` matches `^[A-Za-z0-9_-]+$` and cannot be used to
/// address anything outside the source directory.
pub fn validate_identifier(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(is_identifier_byte) && !has_path_syntax(raw)
}

/// Parse a width or height from its query-string form.
///
/// Returns `None` for anything that is not a plain decimal integer in range.
pub fn validate_dimension(raw: &str) -> Option<Dimension> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // All-digit strings only fail to parse on overflow, which is out of range anyway.
    raw.parse::<u32>().ok().and_then(Dimension::new)
}

/// Validate already-typed parameters.
///
/// Used by [`ThumbnailService`](crate::service::ThumbnailService) as its
/// first step regardless of what the caller has checked.
pub fn validate_params(identifier: &str, width: u32, height: u32) -> ServiceResult<()> {
    if identifier.is_empty() {
        return Err(ServiceError::InvalidFilename("Invalid filename provided"));
    }
    if has_path_syntax(identifier) {
        return Err(ServiceError::InvalidFilename(
            "Filename contains invalid characters",
        ));
    }
    if Dimension::new(width).is_none() || Dimension::new(height).is_none() {
        return Err(ServiceError::InvalidDimensions(
            "Width and height must be between 1 and 5000",
        ));
    }
    Ok(())
}
