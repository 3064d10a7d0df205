//! Error types for rich-text validation

use thiserror::Error;

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;

/// Errors raised when operator-supplied markup is rejected outright.
///
/// Sanitizing never fails; these errors only come from [`crate::validate_rich_text`],
/// which field types call on submitted values before storing them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplatingError {
    /// Rich text exceeds the size limit
    #[error("rich text too large: {size} bytes (max allowed: {max})")]
    TooLarge { size: usize, max: usize },

    /// Rich text nests elements deeper than allowed
    #[error("rich text nesting too deep: {depth} levels (max allowed: {max})")]
    NestingTooDeep { depth: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TemplatingError::TooLarge {
            size: 200_001,
            max: 100_000,
        };
        assert_eq!(
            err.to_string(),
            "rich text too large: 200001 bytes (max allowed: 100000)"
        );
    }

    #[test]
    fn test_nesting_error_mentions_limit() {
        let err = TemplatingError::NestingTooDeep { depth: 40, max: 32 };
        assert!(err.to_string().contains("nesting too deep"));
        assert!(err.to_string().contains("32"));
    }
}
