//! Notification store trait and wire payloads

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::NotificationId;
use super::step::{PersistedStep, StepId, StepStatus};
use crate::domain::error::StoreError;
use crate::domain::workflow::{StepKind, WorkflowKind};

/// The backend's raw view of a notification
///
/// Steps arrive partial and in arbitrary order; reconciliation turns them
/// into the complete ordered view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSnapshot {
    /// Notification identifier
    pub id: NotificationId,

    /// Workflow variant
    pub workflow: WorkflowKind,

    /// Case reference number
    pub reference: String,

    /// Customer the notification belongs to
    pub customer: String,

    /// Installation site address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_address: Option<String>,

    /// Backend's current-step pointer, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepKind>,

    /// Persisted steps, unordered and possibly empty
    #[serde(default)]
    pub steps: Vec<PersistedStep>,

    /// When the notification was created
    pub created_at: DateTime<Utc>,

    /// When the notification was last updated
    pub updated_at: DateTime<Utc>,
}

impl NotificationSnapshot {
    /// Create a snapshot with no persisted steps
    pub fn new(
        id: NotificationId,
        workflow: WorkflowKind,
        reference: impl Into<String>,
        customer: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            workflow,
            reference: reference.into(),
            customer: customer.into(),
            site_address: None,
            current_step: None,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_site_address(mut self, site_address: impl Into<String>) -> Self {
        self.site_address = Some(site_address.into());
        self
    }

    pub fn with_current_step(mut self, current_step: StepKind) -> Self {
        self.current_step = Some(current_step);
        self
    }

    pub fn with_step(mut self, step: PersistedStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_steps(mut self, steps: Vec<PersistedStep>) -> Self {
        self.steps = steps;
        self
    }
}

/// Payload for creating a step together with its initial state
///
/// Materialization and the first status write are one backend call, so a
/// step is never created blank and then patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDraft {
    /// Which step of the workflow to create
    pub kind: StepKind,

    /// Initial review status
    pub status: StepStatus,

    /// Initial notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StepDraft {
    /// Create a pending draft for a step kind
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            status: StepStatus::Pending,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Payload for updating an existing step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepChange {
    /// New review status
    pub status: StepStatus,

    /// New notes; `None` clears them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StepChange {
    pub fn new(status: StepStatus) -> Self {
        Self {
            status,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// The backend's response to a step write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCommit {
    /// The step as persisted
    pub step: PersistedStep,

    /// Authoritative current step after the write, when the backend
    /// recomputed it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepKind>,
}

impl StepCommit {
    pub fn new(step: PersistedStep) -> Self {
        Self {
            step,
            current_step: None,
        }
    }

    pub fn with_current_step(mut self, current_step: StepKind) -> Self {
        self.current_step = Some(current_step);
        self
    }
}

/// Backend interface for notifications and their steps
///
/// The engine never computes workflow progression itself; it relays writes
/// and merges whatever the backend commits back.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    /// Fetch a notification's snapshot
    async fn fetch(&self, id: &NotificationId) -> Result<NotificationSnapshot, StoreError>;

    /// Create a step with its initial status and notes
    async fn create_step(
        &self,
        id: &NotificationId,
        draft: StepDraft,
    ) -> Result<StepCommit, StoreError>;

    /// Update an existing step's status and notes
    async fn update_step(&self, step_id: &StepId, change: StepChange)
        -> Result<StepCommit, StoreError>;
}
