//! Notification domain entity

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::step::{PersistedStep, StepRecord};
use super::tracker::CurrentStepTracker;
use crate::domain::error::StoreError;
use crate::domain::workflow::{StepKind, WorkflowDefinition, WorkflowKind};

/// Regex pattern for valid notification IDs: backend-assigned, opaque
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap());

/// Maximum length for notification IDs
const MAX_ID_LENGTH: usize = 64;

/// Validated notification identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationId(String);

impl NotificationId {
    /// Create a new validated notification ID
    pub fn new(id: impl Into<String>) -> Result<Self, StoreError> {
        let id = id.into();
        validate_notification_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a new notification ID with UUID
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4();
        Self(format!("ntf-{}", uuid))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NotificationId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NotificationId> for String {
    fn from(id: NotificationId) -> Self {
        id.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NotificationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a notification ID string
pub fn validate_notification_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() {
        return Err(StoreError::validation("Notification ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(StoreError::validation(format!(
            "Notification ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(StoreError::validation(format!(
            "Invalid notification ID '{}': must be alphanumeric with hyphens or underscores",
            id
        )));
    }

    Ok(())
}

/// A regulatory notification and its reconciled workflow state
///
/// The step list always holds exactly one record per kind of the active
/// workflow's order, in definition order. Kinds the backend knows but the
/// order does not are dropped during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Backend-assigned durable identifier
    id: NotificationId,

    /// Case reference number shown to customers
    reference: String,

    /// Customer the notification belongs to
    customer: String,

    /// Installation site address
    #[serde(skip_serializing_if = "Option::is_none")]
    site_address: Option<String>,

    /// Workflow variant and current-step pointer
    #[serde(flatten)]
    tracker: CurrentStepTracker,

    /// Reconciled step records, one per kind of the active order
    steps: Vec<StepRecord>,

    /// When the notification was created
    created_at: DateTime<Utc>,

    /// When the notification was last updated
    updated_at: DateTime<Utc>,
}

impl Notification {
    /// Create a new notification with an all-virtual step list
    pub fn new(
        id: NotificationId,
        workflow: WorkflowKind,
        reference: impl Into<String>,
        customer: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let steps = WorkflowDefinition::for_kind(workflow)
            .step_order()
            .iter()
            .map(|kind| StepRecord::placeholder(*kind))
            .collect();

        Self {
            id,
            reference: reference.into(),
            customer: customer.into(),
            site_address: None,
            tracker: CurrentStepTracker::new(workflow),
            steps,
            created_at: now,
            updated_at: now,
        }
    }

    // Builder methods

    pub fn with_site_address(mut self, site_address: impl Into<String>) -> Self {
        self.site_address = Some(site_address.into());
        self
    }

    pub fn with_steps(mut self, steps: Vec<StepRecord>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_current_step(mut self, current: StepKind) -> Self {
        self.tracker.offer(Some(current));
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn site_address(&self) -> Option<&str> {
        self.site_address.as_deref()
    }

    pub fn workflow_kind(&self) -> WorkflowKind {
        self.tracker.workflow()
    }

    /// The static definition of this notification's workflow
    pub fn definition(&self) -> &'static WorkflowDefinition {
        WorkflowDefinition::for_kind(self.workflow_kind())
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn current_step(&self) -> StepKind {
        self.tracker.current()
    }

    pub fn tracker(&self) -> &CurrentStepTracker {
        &self.tracker
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The step record for a kind, if the kind belongs to the active order
    pub fn step(&self, kind: StepKind) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.kind() == kind)
    }

    /// Mutable access to the step record for a kind
    pub fn step_mut(&mut self, kind: StepKind) -> Option<&mut StepRecord> {
        self.steps.iter_mut().find(|s| s.kind() == kind)
    }

    // Mutators

    /// Replace the full step list
    pub fn set_steps(&mut self, steps: Vec<StepRecord>) {
        self.steps = steps;
        self.touch();
    }

    /// Merge a persisted step returned by the backend into the step list
    ///
    /// The record of the same kind becomes materialized with the backend's
    /// status, notes, and timestamps. The notification store is not
    /// authoritative for documents, so a locally known document list
    /// survives a commit that carries none.
    pub fn absorb_step(&mut self, step: PersistedStep) {
        let Some(record) = self.steps.iter_mut().find(|s| s.kind() == step.kind()) else {
            return;
        };

        let step = match record.as_materialized() {
            Some(existing)
                if step.documents().is_empty() && !existing.documents().is_empty() =>
            {
                step.with_documents(existing.documents().to_vec())
            }
            _ => step,
        };

        *record = StepRecord::Materialized(step);
        self.touch();
    }

    /// Apply a backend-reported current step, returning whether it moved
    pub fn offer_current_step(&mut self, reported: Option<StepKind>) -> bool {
        let moved = self.tracker.offer(reported);
        if moved {
            self.touch();
        }
        moved
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::step::{StepId, StepStatus};

    #[test]
    fn test_notification_id_generate() {
        let id = NotificationId::generate();
        assert!(id.as_str().starts_with("ntf-"));
    }

    #[test]
    fn test_notification_id_invalid() {
        assert!(NotificationId::new("").is_err());
        assert!(NotificationId::new("-bad").is_err());
        assert!(NotificationId::new("has spaces").is_err());

        let long_id = "a".repeat(65);
        assert!(NotificationId::new(long_id).is_err());
    }

    #[test]
    fn test_new_notification_has_all_virtual_steps() {
        let notification = Notification::new(
            NotificationId::generate(),
            WorkflowKind::GridConnection,
            "GC/2024/0117",
            "Kowalski Farm",
        );

        assert_eq!(notification.steps().len(), 9);
        assert!(notification.steps().iter().all(|s| s.is_virtual()));
        assert_eq!(notification.current_step(), StepKind::ApplicationSubmission);
        assert_eq!(notification.workflow_kind(), WorkflowKind::GridConnection);
    }

    #[test]
    fn test_builders() {
        let notification = Notification::new(
            NotificationId::generate(),
            WorkflowKind::MicroInstallation,
            "MI/2024/0034",
            "Nowak",
        )
        .with_site_address("Polna 12, Zielona Góra")
        .with_current_step(StepKind::TechnicalAssessment);

        assert_eq!(notification.site_address(), Some("Polna 12, Zielona Góra"));
        assert_eq!(notification.current_step(), StepKind::TechnicalAssessment);
    }

    #[test]
    fn test_step_lookup() {
        let notification = Notification::new(
            NotificationId::generate(),
            WorkflowKind::MicroInstallation,
            "MI/2024/0034",
            "Nowak",
        );

        assert!(notification.step(StepKind::TechnicalAssessment).is_some());
        // Not part of the micro-installation order
        assert!(notification.step(StepKind::DesignApproval).is_none());
    }

    #[test]
    fn test_absorb_step_materializes() {
        let mut notification = Notification::new(
            NotificationId::generate(),
            WorkflowKind::MicroInstallation,
            "MI/2024/0034",
            "Nowak",
        );

        let persisted = PersistedStep::new(StepId::generate(), StepKind::ApplicationSubmission)
            .with_status(StepStatus::Approved);
        notification.absorb_step(persisted);

        let record = notification.step(StepKind::ApplicationSubmission).unwrap();
        assert!(record.is_materialized());
        assert_eq!(record.status(), StepStatus::Approved);
    }

    #[test]
    fn test_absorb_step_keeps_local_documents() {
        use crate::domain::document::{Document, DocumentId};

        let step_id = StepId::generate();
        let mut notification = Notification::new(
            NotificationId::generate(),
            WorkflowKind::MicroInstallation,
            "MI/2024/0034",
            "Nowak",
        );

        let with_doc = PersistedStep::new(step_id.clone(), StepKind::ApplicationSubmission)
            .with_document(Document::new(DocumentId::generate(), "app.pdf", "Other"));
        notification.absorb_step(with_doc);

        // A later commit without documents must not wipe the local list
        let without_doc = PersistedStep::new(step_id, StepKind::ApplicationSubmission)
            .with_status(StepStatus::Approved);
        notification.absorb_step(without_doc);

        let record = notification.step(StepKind::ApplicationSubmission).unwrap();
        assert_eq!(record.status(), StepStatus::Approved);
        assert_eq!(record.documents().len(), 1);
    }

    #[test]
    fn test_offer_current_step() {
        let mut notification = Notification::new(
            NotificationId::generate(),
            WorkflowKind::MicroInstallation,
            "MI/2024/0034",
            "Nowak",
        );

        assert!(!notification.offer_current_step(None));
        assert!(notification.offer_current_step(Some(StepKind::TechnicalAssessment)));
        assert_eq!(notification.current_step(), StepKind::TechnicalAssessment);

        // A kind outside the order is ignored
        assert!(!notification.offer_current_step(Some(StepKind::ConnectionAgreement)));
        assert_eq!(notification.current_step(), StepKind::TechnicalAssessment);
    }

    #[test]
    fn test_serialization_flattens_tracker() {
        let notification = Notification::new(
            NotificationId::generate(),
            WorkflowKind::GridConnection,
            "GC/2024/0117",
            "Kowalski Farm",
        );

        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"workflow\":\"grid_connection\""));
        assert!(json.contains("\"current\":\"application_submission\""));

        let deserialized: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id(), notification.id());
        assert_eq!(deserialized.steps().len(), 9);
    }
}
