//! Current-step tracker

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::workflow::{StepKind, WorkflowDefinition, WorkflowKind};

/// Tracks which step of the workflow a notification is currently on
///
/// The backend is the only source of truth for the pointer: the tracker
/// never computes "the next step" on its own and only moves when offered a
/// backend-reported value. Reported values are applied even when they move
/// backward in the order, since the backend may roll a decision back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStepTracker {
    /// Workflow variant the pointer ranges over
    workflow: WorkflowKind,

    /// Current step; always a member of the workflow's order
    current: StepKind,
}

impl CurrentStepTracker {
    /// Create a tracker pointing at the workflow's first step
    pub fn new(workflow: WorkflowKind) -> Self {
        Self {
            workflow,
            current: WorkflowDefinition::for_kind(workflow).first_step(),
        }
    }

    pub fn workflow(&self) -> WorkflowKind {
        self.workflow
    }

    pub fn current(&self) -> StepKind {
        self.current
    }

    /// Zero-based position of the current step in the order
    pub fn position(&self) -> usize {
        self.definition().position(self.current).unwrap_or(0)
    }

    /// Apply a backend-reported current step
    ///
    /// Returns whether the pointer moved. `None` and values equal to the
    /// current step leave it unchanged; kinds outside the workflow's order
    /// are ignored with a warning.
    pub fn offer(&mut self, reported: Option<StepKind>) -> bool {
        let Some(kind) = reported else {
            return false;
        };

        let definition = self.definition();
        let Some(new_position) = definition.position(kind) else {
            warn!(
                workflow = %self.workflow,
                step = %kind,
                "Ignoring reported current step outside the workflow order"
            );
            return false;
        };

        if kind == self.current {
            return false;
        }

        if new_position < self.position() {
            debug!(
                workflow = %self.workflow,
                from = %self.current,
                to = %kind,
                "Current step moved backward"
            );
        }

        self.current = kind;
        true
    }

    fn definition(&self) -> &'static WorkflowDefinition {
        WorkflowDefinition::for_kind(self.workflow)
    }
}
