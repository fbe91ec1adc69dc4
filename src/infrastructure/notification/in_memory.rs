//! In-memory notification store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::error::StoreError;
use crate::domain::notification::{
    NotificationId, NotificationSnapshot, NotificationStore, PersistedStep, StepChange,
    StepCommit, StepDraft, StepId,
};
use crate::domain::workflow::{StepKind, WorkflowDefinition};

/// In-memory implementation of [`NotificationStore`]
///
/// Reference backend for tests and development; data is lost when the
/// process terminates. It plays the authoritative current-step rule the
/// real backend owns: approving the step a notification is currently at
/// advances the pointer to the next step of the order and reports it in
/// the commit. Any other write leaves the pointer alone.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    snapshots: RwLock<HashMap<String, NotificationSnapshot>>,
}

impl InMemoryNotificationStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a snapshot
    pub fn with_snapshot(self, snapshot: NotificationSnapshot) -> Self {
        {
            let mut snapshots = self.snapshots.write().unwrap();
            snapshots.insert(snapshot.id.as_str().to_string(), snapshot);
        }
        self
    }

    /// Advance the pointer if the written step approved the current one
    fn recompute_current_step(
        snapshot: &mut NotificationSnapshot,
        step: &PersistedStep,
    ) -> Option<StepKind> {
        if !step.status().is_approved() {
            return None;
        }

        let definition = WorkflowDefinition::for_kind(snapshot.workflow);
        let current = snapshot
            .current_step
            .unwrap_or_else(|| definition.first_step());
        if step.kind() != current {
            return None;
        }

        let next = definition.next_after(current)?;
        snapshot.current_step = Some(next);
        Some(next)
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn fetch(&self, id: &NotificationId) -> Result<NotificationSnapshot, StoreError> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| StoreError::backend("Failed to acquire lock"))?;

        snapshots
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("Notification '{}' not found", id)))
    }

    async fn create_step(
        &self,
        id: &NotificationId,
        draft: StepDraft,
    ) -> Result<StepCommit, StoreError> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| StoreError::backend("Failed to acquire lock"))?;

        let snapshot = snapshots
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::not_found(format!("Notification '{}' not found", id)))?;

        let definition = WorkflowDefinition::for_kind(snapshot.workflow);
        if !definition.contains(draft.kind) {
            return Err(StoreError::validation(format!(
                "Step kind '{}' does not belong to workflow '{}'",
                draft.kind, snapshot.workflow
            )));
        }

        if snapshot.steps.iter().any(|s| s.kind() == draft.kind) {
            return Err(StoreError::conflict(format!(
                "Step '{}' already exists for notification '{}'",
                draft.kind, id
            )));
        }

        let mut step = PersistedStep::new(StepId::generate(), draft.kind).with_status(draft.status);
        if let Some(notes) = draft.notes {
            step = step.with_notes(notes);
        }
        snapshot.steps.push(step.clone());

        let current_step = Self::recompute_current_step(snapshot, &step);

        let mut commit = StepCommit::new(step);
        commit.current_step = current_step;
        Ok(commit)
    }

    async fn update_step(
        &self,
        step_id: &StepId,
        change: StepChange,
    ) -> Result<StepCommit, StoreError> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| StoreError::backend("Failed to acquire lock"))?;

        for snapshot in snapshots.values_mut() {
            let Some(pos) = snapshot.steps.iter().position(|s| s.id() == step_id) else {
                continue;
            };

            let step = &mut snapshot.steps[pos];
            step.set_status(change.status);
            step.set_notes(change.notes);
            let step = step.clone();

            let current_step = Self::recompute_current_step(snapshot, &step);

            let mut commit = StepCommit::new(step);
            commit.current_step = current_step;
            return Ok(commit);
        }

        Err(StoreError::not_found(format!(
            "Step '{}' not found",
            step_id
        )))
    }
}
