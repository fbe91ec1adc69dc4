//! Notification domain module
//!
//! Per-notification workflow state: the notification entity, its step
//! records (persisted or virtual), the reconciler that turns backend
//! snapshots into complete ordered step lists, the current-step tracker,
//! and the store trait the backend implements.

mod entity;
pub mod reconciler;
mod step;
pub mod store;
mod tracker;

pub use entity::{validate_notification_id, Notification, NotificationId};
pub use reconciler::reconcile;
pub use step::{validate_step_id, PersistedStep, StepId, StepRecord, StepStatus, VirtualStep};
pub use store::{NotificationSnapshot, NotificationStore, StepChange, StepCommit, StepDraft};
pub use tracker::CurrentStepTracker;
