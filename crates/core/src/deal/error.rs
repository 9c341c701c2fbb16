//! Deal error types for lifecycle and orchestration failures.

use thiserror::Error;
use uuid::Uuid;

use crate::deal::types::DealStatus;

/// Errors that can occur during deal operations.
#[derive(Debug, Error)]
pub enum DealError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: DealStatus,
        /// The attempted target status.
        to: DealStatus,
    },

    /// Deal not found.
    #[error("Deal {0} not found")]
    DealNotFound(Uuid),

    /// User not found.
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl DealError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 400,
            Self::DealNotFound(_) | Self::UserNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::DealNotFound(_) => "DEAL_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = DealError::InvalidTransition {
            from: DealStatus::Rejected,
            to: DealStatus::Approved,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("rejected"));
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_not_found_errors() {
        assert_eq!(DealError::DealNotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(
            DealError::DealNotFound(Uuid::nil()).error_code(),
            "DEAL_NOT_FOUND"
        );
        assert_eq!(DealError::UserNotFound(Uuid::nil()).status_code(), 404);
    }

    #[test]
    fn test_database_error() {
        let err = DealError::Database("connection refused".to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
