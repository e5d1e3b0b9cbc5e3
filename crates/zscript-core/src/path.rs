//! Virtual resource path rules.
//!
//! Include paths name resources inside an archive, not files on the host.
//! They are always relative to the archive root, use `/` as the only
//! separator on every platform, and compare case-insensitively.

use thiserror::Error;

/// Why an include path was rejected. Checks run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("include path is empty")]
    Empty,

    #[error("include path contains invalid characters")]
    InvalidCharacters,

    #[error("absolute include paths are not supported")]
    Absolute,

    #[error("relative include paths are not supported")]
    Relative,

    #[error("only forward slashes are allowed in include paths")]
    Backslash,
}

/// Characters no archive entry name may contain.
#[inline]
pub fn is_invalid_path_char(c: char) -> bool {
    matches!(c, '<' | '>' | '|' | '"' | '?' | '*') || c.is_ascii_control()
}

/// Validate an include path against the archive namespace rules.
pub fn validate_include_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    if path.chars().any(is_invalid_path_char) {
        return Err(PathError::InvalidCharacters);
    }

    if is_absolute(path) {
        return Err(PathError::Absolute);
    }

    if path.split(['/', '\\']).any(|segment| segment == "." || segment == "..") {
        return Err(PathError::Relative);
    }

    if path.contains('\\') {
        return Err(PathError::Backslash);
    }

    Ok(())
}

/// Rooted paths and drive-prefixed paths.
fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    match bytes {
        [b'/' | b'\\', ..] => true,
        [drive, b':', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// The case-folded key two paths share when they name the same resource.
pub fn path_key(path: &str) -> String {
    path.to_lowercase()
}
