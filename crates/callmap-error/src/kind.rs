//! Error kinds for callmap operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// This enum categorizes errors so callers can match on the failure class
/// without inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration or parameters
    ConfigInvalid,

    // =========================================================================
    // Selection errors
    // =========================================================================
    /// The focus pattern could not be compiled into a matcher
    FocusInvalid,

    // =========================================================================
    // Output errors
    // =========================================================================
    /// Output destination not found
    FileNotFound,

    /// Permission denied on the output destination
    PermissionDenied,

    /// IO operation failed
    IoFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::FocusInvalid.to_string(), "FocusInvalid");
        assert_eq!(ErrorKind::IoFailed.to_string(), "IoFailed");
    }

    #[test]
    fn test_kind_into_static_str() {
        let s: &'static str = ErrorKind::PermissionDenied.into();
        assert_eq!(s, "PermissionDenied");
    }
}
