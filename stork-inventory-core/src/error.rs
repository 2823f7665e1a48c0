//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use stork_inventory_backend::BackendError;
use stork_inventory_backend::RecordId;

use crate::engine::{LifecycleAction, ValidationError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Local duplicate / format check failed; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The typed confirmation phrase does not match.
    #[error("Type \"{expected}\" to confirm")]
    ConfirmationMismatch { expected: &'static str },

    /// Lifecycle action not allowed from the record's current state
    /// (e.g. permanent delete of an active record).
    #[error("Cannot {action:?} record #{id} in its current state")]
    InvalidTransition { action: LifecycleAction, id: RecordId },

    /// Record not found in the panel's store
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// Bulk action requested with nothing selected in the current view
    #[error("No records selected")]
    NoSelection,

    /// `confirm` called while no confirmation dialog is open
    #[error("No confirmation pending")]
    NoPendingConfirmation,

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend error (converting from library)
    #[error("{0}")]
    Backend(#[from] BackendError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::ConfirmationMismatch { .. }
            | Self::InvalidTransition { .. }
            | Self::RecordNotFound(_)
            | Self::NoSelection
            | Self::NoPendingConfirmation => true,
            Self::Backend(e) => e.is_expected(),
            Self::Export(_) | Self::Config(_) | Self::Serialization(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_expectedness_passes_through() {
        let conflict = CoreError::from(BackendError::Conflict {
            backend: "postgrest".into(),
            raw_message: None,
        });
        let down = CoreError::from(BackendError::Network {
            backend: "postgrest".into(),
            detail: "refused".into(),
        });
        assert!(conflict.is_expected());
        assert!(!down.is_expected());
    }

    #[test]
    fn serializes_with_code() {
        let e = CoreError::ConfirmationMismatch { expected: "DELETE" };
        let json = serde_json::to_value(&e).unwrap_or_default();
        assert_eq!(json["code"], "ConfirmationMismatch");
        assert_eq!(json["details"]["expected"], "DELETE");
    }
}
