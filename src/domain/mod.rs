//! Domain layer - entities, store traits, and engine rules

pub mod document;
pub mod error;
pub mod notification;
pub mod workflow;

pub use document::{Document, DocumentId, DocumentStore, DocumentUpload};
pub use error::StoreError;
pub use notification::{
    reconcile, CurrentStepTracker, Notification, NotificationId, NotificationSnapshot,
    NotificationStore, PersistedStep, StepChange, StepCommit, StepDraft, StepId, StepRecord,
    StepStatus, VirtualStep,
};
pub use workflow::{StepKind, WorkflowDefinition, WorkflowError, WorkflowKind};
