//! Workflow engine error types

use thiserror::Error;

use super::kinds::{StepKind, WorkflowKind};

/// Errors surfaced by workflow engine operations
///
/// None of these are fatal: every failure is scoped to a single operation,
/// local state is left as it was before the call, and the caller re-renders
/// from the last reconciled state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Failed to load notification '{id}': {message}")]
    NotificationLoadFailed { id: String, message: String },

    #[error("Step mutation failed for '{step}': {message}")]
    StepMutationFailed { step: StepKind, message: String },

    #[error("Document upload failed for step '{step}': {message}")]
    DocumentUploadFailed { step: StepKind, message: String },

    #[error("Listing documents failed for step '{step}': {message}")]
    DocumentListFailed { step: StepKind, message: String },

    #[error("Document '{document_id}' not found in step '{step}'")]
    DocumentNotFound {
        step: StepKind,
        document_id: String,
    },

    #[error("Document removal failed for step '{step}': {message}")]
    DocumentRemovalFailed { step: StepKind, message: String },

    #[error("Step kind '{kind}' does not belong to workflow '{workflow}'")]
    UnknownStepKind {
        kind: StepKind,
        workflow: WorkflowKind,
    },
}

impl WorkflowError {
    pub fn notification_not_found(id: impl Into<String>) -> Self {
        Self::NotificationNotFound(id.into())
    }

    pub fn notification_load_failed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotificationLoadFailed {
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn step_mutation_failed(step: StepKind, message: impl Into<String>) -> Self {
        Self::StepMutationFailed {
            step,
            message: message.into(),
        }
    }

    pub fn document_upload_failed(step: StepKind, message: impl Into<String>) -> Self {
        Self::DocumentUploadFailed {
            step,
            message: message.into(),
        }
    }

    pub fn document_list_failed(step: StepKind, message: impl Into<String>) -> Self {
        Self::DocumentListFailed {
            step,
            message: message.into(),
        }
    }

    pub fn document_not_found(step: StepKind, document_id: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            step,
            document_id: document_id.into(),
        }
    }

    pub fn document_removal_failed(step: StepKind, message: impl Into<String>) -> Self {
        Self::DocumentRemovalFailed {
            step,
            message: message.into(),
        }
    }

    pub fn unknown_step_kind(kind: StepKind, workflow: WorkflowKind) -> Self {
        Self::UnknownStepKind { kind, workflow }
    }

    /// Whether the failed operation's goal already holds
    ///
    /// True for [`WorkflowError::DocumentNotFound`]: removing a document
    /// that no longer exists leaves exactly the state the caller asked for,
    /// so callers typically treat it as success.
    pub fn is_already_satisfied(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }
}
