//! Error types for the campaign builder
//!
//! Only operator actions (adding a field, saving settings, loading or saving a
//! campaign) return errors. Rendering recovers locally: an unknown field type or
//! absent campaign data becomes a placeholder, never an `Err`.

use crate::campaign::FieldId;
use campaign_builder_config::ConfigError;
use thiserror::Error;

/// Result type for campaign builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Severity levels for error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but the builder can continue
    Error,
    /// Stored data is unusable or unreachable
    Critical,
}

/// Trait for error types that have severity levels
pub trait Severity {
    fn severity(&self) -> ErrorSeverity;
}

/// Errors that can occur in campaign builder operations
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Missing or invalid request token
    #[error("request token is missing or invalid")]
    Unauthorized,

    /// Valid token, insufficient permission
    #[error("actor '{actor}' is not allowed to {action}")]
    Forbidden { actor: String, action: String },

    /// An add-field request without a type id
    #[error("no field type supplied")]
    MissingFieldType,

    /// A field id that is not a non-negative integer
    #[error("invalid field id: '{value}'")]
    InvalidFieldId { value: String },

    /// A settings form control name that does not match `fields[<id>][<key>]`
    #[error("invalid settings path: '{path}'")]
    InvalidSettingsPath { path: String },

    /// A layout address that points outside the tree
    #[error("invalid layout address: {address}")]
    InvalidLayoutAddress { address: String },

    #[error("unknown field type: {type_id}")]
    UnknownFieldType { type_id: String },

    #[error("field not found: {id}")]
    FieldNotFound { id: FieldId },

    #[error("field type '{type_id}' allows at most {max} per page")]
    FieldLimitReached { type_id: String, max: u32 },

    #[error("field type '{type_id}' cannot be deleted")]
    FieldNotDeletable { type_id: String },

    /// Submitted settings or values rejected by a field type
    #[error("validation error on field {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// Campaign store failure other than plain IO
    #[error("campaign store error: {message}")]
    Store { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BuilderError {
    pub fn store(message: impl Into<String>) -> Self {
        BuilderError::Store {
            message: message.into(),
        }
    }

    /// Whether this error came from the authorization check
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            BuilderError::Unauthorized | BuilderError::Forbidden { .. }
        )
    }

    /// Message suitable for showing to the operator in the builder UI.
    ///
    /// Storage and configuration details are logged, not shown.
    pub fn operator_message(&self) -> String {
        match self {
            BuilderError::Unauthorized => {
                "Your session has expired. Reload the page and try again.".to_string()
            }
            BuilderError::Forbidden { .. } => {
                "You do not have permission to edit this campaign.".to_string()
            }
            BuilderError::MissingFieldType => "Choose a block type to add.".to_string(),
            BuilderError::UnknownFieldType { type_id } => {
                format!("The block type '{type_id}' is not available.")
            }
            BuilderError::FieldLimitReached { max, .. } => {
                format!("This block can only be added {max} time(s) per page.")
            }
            BuilderError::FieldNotDeletable { .. } => "This block cannot be removed.".to_string(),
            BuilderError::ValidationFailed { message, .. } => message.clone(),
            BuilderError::InvalidFieldId { .. }
            | BuilderError::InvalidSettingsPath { .. }
            | BuilderError::InvalidLayoutAddress { .. }
            | BuilderError::FieldNotFound { .. } => {
                "The request was malformed. Reload the page and try again.".to_string()
            }
            BuilderError::Store { .. }
            | BuilderError::Io(_)
            | BuilderError::Json(_)
            | BuilderError::Config(_) => {
                "The campaign could not be loaded or saved. Please try again.".to_string()
            }
        }
    }
}

impl Severity for BuilderError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BuilderError::Store { .. }
            | BuilderError::Io(_)
            | BuilderError::Json(_)
            | BuilderError::Config(_) => ErrorSeverity::Critical,

            BuilderError::Unauthorized
            | BuilderError::Forbidden { .. }
            | BuilderError::MissingFieldType
            | BuilderError::InvalidFieldId { .. }
            | BuilderError::InvalidSettingsPath { .. }
            | BuilderError::InvalidLayoutAddress { .. }
            | BuilderError::UnknownFieldType { .. }
            | BuilderError::FieldNotFound { .. } => ErrorSeverity::Error,

            BuilderError::FieldLimitReached { .. }
            | BuilderError::FieldNotDeletable { .. }
            | BuilderError::ValidationFailed { .. } => ErrorSeverity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuilderError::FieldLimitReached {
            type_id: "donate-amount".into(),
            max: 1,
        };
        assert_eq!(
            err.to_string(),
            "field type 'donate-amount' allows at most 1 per page"
        );
    }

    #[test]
    fn test_authorization_errors() {
        assert!(BuilderError::Unauthorized.is_authorization());
        assert!(BuilderError::Forbidden {
            actor: "viewer".into(),
            action: "add fields".into()
        }
        .is_authorization());
        assert!(!BuilderError::MissingFieldType.is_authorization());
    }

    #[test]
    fn test_severity() {
        assert_eq!(BuilderError::Unauthorized.severity(), ErrorSeverity::Error);
        assert_eq!(
            BuilderError::store("disk full").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            BuilderError::ValidationFailed {
                field: "3".into(),
                message: "too long".into()
            }
            .severity(),
            ErrorSeverity::Warning
        );
    }

    #[test]
    fn test_operator_message_hides_storage_details() {
        let err = BuilderError::store("/var/lib/campaigns/campaign-3.json: permission denied");
        assert!(!err.operator_message().contains("/var/lib"));
    }
}
