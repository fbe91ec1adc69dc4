use thiserror::Error;

/// Failures reported by backend store implementations
///
/// Shared by [`NotificationStore`](crate::domain::notification::NotificationStore)
/// and [`DocumentStore`](crate::domain::document::DocumentStore). The engine
/// maps these onto [`WorkflowError`](crate::domain::workflow::WorkflowError)
/// variants at the operation boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Whether this error means the target does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = StoreError::not_found("Notification 'ntf-123' not found");
        assert_eq!(
            error.to_string(),
            "Not found: Notification 'ntf-123' not found"
        );
        assert!(error.is_not_found());
    }

    #[test]
    fn test_backend_error() {
        let error = StoreError::backend("Connection reset");
        assert_eq!(error.to_string(), "Backend error: Connection reset");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_validation_error() {
        let error = StoreError::validation("Empty file name");
        assert_eq!(error.to_string(), "Validation error: Empty file name");
    }
}
