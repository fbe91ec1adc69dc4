//! Step status service
//!
//! Applies status changes to workflow steps and owns the
//! materialize-on-first-write rule: a mutation against a virtual step
//! becomes a single create-with-status call, so a persisted step never
//! exists without a status. Local state is only touched after the store
//! call succeeds; on failure the step stays exactly as it was and the
//! caller re-renders from the last reconciled state.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::error::StoreError;
use crate::domain::notification::{
    reconcile, Notification, NotificationId, NotificationStore, StepChange, StepDraft, StepId,
    StepStatus,
};
use crate::domain::workflow::{StepKind, WorkflowError};

/// Service applying status changes to a notification's workflow steps
///
/// Callers must not issue two mutations against the same step
/// concurrently; the service serializes nothing itself.
#[derive(Debug, Clone)]
pub struct StepService {
    store: Arc<dyn NotificationStore>,
}

impl StepService {
    /// Create a new step service over a notification store
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Fetch a notification and reconcile its step list
    ///
    /// The returned notification always carries one step record per kind of
    /// its workflow's order, in definition order.
    #[instrument(skip(self))]
    pub async fn load(&self, id: &NotificationId) -> Result<Notification, WorkflowError> {
        let snapshot = self.store.fetch(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => WorkflowError::notification_not_found(id.as_str()),
            other => WorkflowError::notification_load_failed(id.as_str(), other.to_string()),
        })?;

        let steps = reconcile(snapshot.workflow, snapshot.steps);

        let mut notification = Notification::new(
            snapshot.id,
            snapshot.workflow,
            snapshot.reference,
            snapshot.customer,
        )
        .with_steps(steps);

        if let Some(site_address) = snapshot.site_address {
            notification = notification.with_site_address(site_address);
        }
        if let Some(current) = snapshot.current_step {
            notification = notification.with_current_step(current);
        }

        Ok(notification.with_timestamps(snapshot.created_at, snapshot.updated_at))
    }

    /// Change a step's status and notes
    ///
    /// A virtual step is materialized by the call: the create request
    /// carries the new status and notes, and the committed step replaces
    /// the placeholder. A materialized step gets a direct update against
    /// its durable id. Either way the backend's reported current step, if
    /// any, is offered to the notification's tracker.
    #[instrument(
        skip(self, notification, notes),
        fields(notification = %notification.id(), step = %kind, status = %status)
    )]
    pub async fn update_status(
        &self,
        notification: &mut Notification,
        kind: StepKind,
        status: StepStatus,
        notes: Option<String>,
    ) -> Result<(), WorkflowError> {
        let record = notification
            .step(kind)
            .ok_or_else(|| WorkflowError::unknown_step_kind(kind, notification.workflow_kind()))?;
        let was_virtual = record.is_virtual();

        let commit = match record.id().cloned() {
            None => {
                let mut draft = StepDraft::new(kind).with_status(status);
                if let Some(notes) = notes {
                    draft = draft.with_notes(notes);
                }

                self.store
                    .create_step(notification.id(), draft)
                    .await
                    .map_err(|e| WorkflowError::step_mutation_failed(kind, e.to_string()))?
            }
            Some(step_id) => {
                let mut change = StepChange::new(status);
                if let Some(notes) = notes {
                    change = change.with_notes(notes);
                }

                self.store
                    .update_step(&step_id, change)
                    .await
                    .map_err(|e| WorkflowError::step_mutation_failed(kind, e.to_string()))?
            }
        };

        notification.absorb_step(commit.step);
        info!(materialized = was_virtual, "Step status updated");

        if notification.offer_current_step(commit.current_step) {
            info!(current = %notification.current_step(), "Current step moved by the backend");
        }

        Ok(())
    }

    /// Ensure a step has a durable identity, creating it when virtual
    ///
    /// The create request is seeded with the placeholder's draft status and
    /// notes, so a step attached to before any decision lands as pending.
    /// Already-materialized steps return their existing id without a store
    /// call.
    #[instrument(
        skip(self, notification),
        fields(notification = %notification.id(), step = %kind)
    )]
    pub async fn materialize(
        &self,
        notification: &mut Notification,
        kind: StepKind,
    ) -> Result<StepId, WorkflowError> {
        let record = notification
            .step(kind)
            .ok_or_else(|| WorkflowError::unknown_step_kind(kind, notification.workflow_kind()))?;

        if let Some(id) = record.id() {
            return Ok(id.clone());
        }

        let mut draft = StepDraft::new(kind).with_status(record.status());
        if let Some(notes) = record.notes() {
            draft = draft.with_notes(notes);
        }

        let commit = self
            .store
            .create_step(notification.id(), draft)
            .await
            .map_err(|e| WorkflowError::step_mutation_failed(kind, e.to_string()))?;

        let step_id = commit.step.id().clone();
        notification.absorb_step(commit.step);
        notification.offer_current_step(commit.current_step);

        info!(step_id = %step_id, "Materialized step");
        Ok(step_id)
    }
}
