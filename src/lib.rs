//! Step workflow engine for grid-connection regulatory notifications
//!
//! Tracks the multi-step approval process behind a customer's
//! grid-connection notification for an electrical-works contractor's
//! administration backend:
//! - Two workflow variants with fixed step orders (full grid connection,
//!   simplified micro-installation)
//! - Reconciliation of the backend's partial step data into a complete
//!   ordered step list, with virtual placeholders for missing steps
//! - Materialize-on-first-write: a virtual step is persisted by its first
//!   status change or document upload, as a single create-with-status call
//! - Document attachment, refresh, and idempotent removal per step
//! - A current-step pointer that only moves when the backend reports a new
//!   value
//!
//! Persistence and file storage stay behind the [`NotificationStore`] and
//! [`DocumentStore`] traits; in-memory implementations are provided for
//! tests and development.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use grid_notification_workflow::{
//!     DocumentService, DocumentUpload, InMemoryDocumentStore, InMemoryNotificationStore,
//!     NotificationId, NotificationSnapshot, StepKind, StepService, StepStatus, WorkflowKind,
//! };
//!
//! tokio_test::block_on(async {
//!     let snapshot = NotificationSnapshot::new(
//!         NotificationId::generate(),
//!         WorkflowKind::MicroInstallation,
//!         "MI/2024/0034",
//!         "Nowak",
//!     );
//!     let id = snapshot.id.clone();
//!
//!     let notifications = Arc::new(InMemoryNotificationStore::new().with_snapshot(snapshot));
//!     let documents = Arc::new(InMemoryDocumentStore::new());
//!
//!     let steps = StepService::new(notifications);
//!     let binder = DocumentService::new(steps.clone(), documents);
//!
//!     // Five steps, all virtual until something is written
//!     let mut notification = steps.load(&id).await.unwrap();
//!     assert_eq!(notification.steps().len(), 5);
//!
//!     // Approving the first step materializes it; the backend advances
//!     // the current-step pointer and the tracker follows
//!     steps
//!         .update_status(
//!             &mut notification,
//!             StepKind::ApplicationSubmission,
//!             StepStatus::Approved,
//!             Some("Filed in person".to_string()),
//!         )
//!         .await
//!         .unwrap();
//!     assert_eq!(notification.current_step(), StepKind::TechnicalAssessment);
//!
//!     // Attaching to a virtual step materializes it with pending status
//!     let upload = DocumentUpload::new(
//!         "assessment.pdf",
//!         "Technical assessment report",
//!         "file contents",
//!     );
//!     let document = binder
//!         .attach(&mut notification, StepKind::TechnicalAssessment, upload)
//!         .await
//!         .unwrap();
//!     assert_eq!(document.content_type(), "application/pdf");
//! });
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    reconcile, CurrentStepTracker, Document, DocumentId, DocumentStore, DocumentUpload,
    Notification, NotificationId, NotificationSnapshot, NotificationStore, PersistedStep,
    StepChange, StepCommit, StepDraft, StepId, StepKind, StepRecord, StepStatus, StoreError,
    VirtualStep, WorkflowDefinition, WorkflowError, WorkflowKind,
};
pub use infrastructure::document::InMemoryDocumentStore;
pub use infrastructure::logging::init_logging;
pub use infrastructure::notification::InMemoryNotificationStore;
pub use infrastructure::services::{DocumentService, DocumentServiceConfig, StepService};
