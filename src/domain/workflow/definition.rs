//! Static workflow definitions

use super::kinds::{StepKind, WorkflowKind};

/// Ordered steps of the full grid-connection procedure
const GRID_CONNECTION_STEPS: [StepKind; 9] = [
    StepKind::ApplicationSubmission,
    StepKind::ConnectionOpinion,
    StepKind::ConnectionConditions,
    StepKind::ConnectionAgreement,
    StepKind::DesignApproval,
    StepKind::InstallationWorks,
    StepKind::InstallationInspection,
    StepKind::MeterInstallation,
    StepKind::GridActivation,
];

/// Ordered steps of the simplified micro-installation procedure
const MICRO_INSTALLATION_STEPS: [StepKind; 5] = [
    StepKind::ApplicationSubmission,
    StepKind::TechnicalAssessment,
    StepKind::InstallationInspection,
    StepKind::MeterInstallation,
    StepKind::GridActivation,
];

static GRID_CONNECTION: WorkflowDefinition = WorkflowDefinition {
    kind: WorkflowKind::GridConnection,
    steps: &GRID_CONNECTION_STEPS,
};

static MICRO_INSTALLATION: WorkflowDefinition = WorkflowDefinition {
    kind: WorkflowKind::MicroInstallation,
    steps: &MICRO_INSTALLATION_STEPS,
};

/// Static definition of a workflow variant: its step order and the
/// document types each step expects
///
/// Definitions are fixed at compile time. A notification's reconciled step
/// list always has exactly one record per kind in its definition's order.
#[derive(Debug)]
pub struct WorkflowDefinition {
    kind: WorkflowKind,
    steps: &'static [StepKind],
}

impl WorkflowDefinition {
    /// Look up the definition for a workflow variant
    pub fn for_kind(kind: WorkflowKind) -> &'static WorkflowDefinition {
        match kind {
            WorkflowKind::GridConnection => &GRID_CONNECTION,
            WorkflowKind::MicroInstallation => &MICRO_INSTALLATION,
        }
    }

    /// The workflow variant this definition describes
    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    /// The full step order
    pub fn step_order(&self) -> &'static [StepKind] {
        self.steps
    }

    /// Number of steps in the order
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether a step kind belongs to this workflow
    pub fn contains(&self, kind: StepKind) -> bool {
        self.steps.contains(&kind)
    }

    /// Zero-based position of a step kind in the order
    pub fn position(&self, kind: StepKind) -> Option<usize> {
        self.steps.iter().position(|s| *s == kind)
    }

    /// The first step of the order
    pub fn first_step(&self) -> StepKind {
        self.steps[0]
    }

    /// The step following `kind` in the order
    ///
    /// Returns `None` for the last step and for kinds outside this workflow.
    pub fn next_after(&self, kind: StepKind) -> Option<StepKind> {
        let pos = self.position(kind)?;
        self.steps.get(pos + 1).copied()
    }

    /// Document type labels for a step of this workflow
    ///
    /// Returns `None` for kinds outside this workflow.
    pub fn document_types(&self, kind: StepKind) -> Option<&'static [&'static str]> {
        self.contains(kind).then(|| kind.document_types())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_connection_order() {
        let def = WorkflowDefinition::for_kind(WorkflowKind::GridConnection);

        assert_eq!(def.kind(), WorkflowKind::GridConnection);
        assert_eq!(def.step_count(), 9);
        assert_eq!(def.first_step(), StepKind::ApplicationSubmission);
        assert_eq!(def.step_order().last(), Some(&StepKind::GridActivation));
    }

    #[test]
    fn test_micro_installation_order() {
        let def = WorkflowDefinition::for_kind(WorkflowKind::MicroInstallation);

        assert_eq!(def.kind(), WorkflowKind::MicroInstallation);
        assert_eq!(def.step_count(), 5);
        assert_eq!(
            def.step_order(),
            &[
                StepKind::ApplicationSubmission,
                StepKind::TechnicalAssessment,
                StepKind::InstallationInspection,
                StepKind::MeterInstallation,
                StepKind::GridActivation,
            ]
        );
    }

    #[test]
    fn test_orders_have_no_duplicates() {
        for kind in [WorkflowKind::GridConnection, WorkflowKind::MicroInstallation] {
            let steps = WorkflowDefinition::for_kind(kind).step_order();
            let mut seen = std::collections::HashSet::new();
            for step in steps {
                assert!(seen.insert(step), "{} appears twice in {}", step, kind);
            }
        }
    }

    #[test]
    fn test_contains_cross_variant() {
        let grid = WorkflowDefinition::for_kind(WorkflowKind::GridConnection);
        let micro = WorkflowDefinition::for_kind(WorkflowKind::MicroInstallation);

        assert!(grid.contains(StepKind::ConnectionConditions));
        assert!(!micro.contains(StepKind::ConnectionConditions));

        assert!(micro.contains(StepKind::TechnicalAssessment));
        assert!(!grid.contains(StepKind::TechnicalAssessment));

        // Shared kinds belong to both
        assert!(grid.contains(StepKind::MeterInstallation));
        assert!(micro.contains(StepKind::MeterInstallation));
    }

    #[test]
    fn test_position() {
        let def = WorkflowDefinition::for_kind(WorkflowKind::GridConnection);

        assert_eq!(def.position(StepKind::ApplicationSubmission), Some(0));
        assert_eq!(def.position(StepKind::GridActivation), Some(8));
        assert_eq!(def.position(StepKind::TechnicalAssessment), None);
    }

    #[test]
    fn test_next_after() {
        let def = WorkflowDefinition::for_kind(WorkflowKind::MicroInstallation);

        assert_eq!(
            def.next_after(StepKind::ApplicationSubmission),
            Some(StepKind::TechnicalAssessment)
        );
        assert_eq!(def.next_after(StepKind::GridActivation), None);
        assert_eq!(def.next_after(StepKind::ConnectionOpinion), None);
    }

    #[test]
    fn test_document_types_available_for_every_step() {
        for kind in [WorkflowKind::GridConnection, WorkflowKind::MicroInstallation] {
            let def = WorkflowDefinition::for_kind(kind);
            for step in def.step_order() {
                let types = def.document_types(*step).unwrap();
                assert!(!types.is_empty());
            }
        }
    }

    #[test]
    fn test_document_types_unknown_kind() {
        let micro = WorkflowDefinition::for_kind(WorkflowKind::MicroInstallation);
        assert!(micro.document_types(StepKind::DesignApproval).is_none());
    }
}
