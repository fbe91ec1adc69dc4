//! Step reconciliation
//!
//! Turns the backend's partial, unordered step list into the complete
//! ordered view the admin pages render: one record per kind of the
//! workflow's order, materialized where the backend has a record and a
//! virtual placeholder everywhere else.

use std::collections::HashMap;

use tracing::warn;

use super::step::{PersistedStep, StepRecord};
use crate::domain::workflow::{StepKind, WorkflowDefinition, WorkflowKind};

/// Reconcile persisted steps against the workflow's step order
///
/// The result always has exactly one record per kind of the order, in
/// definition order, regardless of how many persisted steps exist or how
/// they are sorted. Persisted steps whose kind is outside the order are
/// dropped, as are duplicates of a kind (first arrival wins). Pure except
/// for warning logs on dropped input; safe to call repeatedly, though
/// virtual markers are fresh on every call.
pub fn reconcile(workflow: WorkflowKind, persisted: Vec<PersistedStep>) -> Vec<StepRecord> {
    let definition = WorkflowDefinition::for_kind(workflow);
    let mut by_kind: HashMap<StepKind, PersistedStep> = HashMap::with_capacity(persisted.len());

    for step in persisted {
        if !definition.contains(step.kind()) {
            warn!(
                workflow = %workflow,
                step = %step.kind(),
                step_id = %step.id(),
                "Dropping persisted step outside the workflow order"
            );
            continue;
        }

        if let Some(kept) = by_kind.get(&step.kind()) {
            warn!(
                workflow = %workflow,
                step = %step.kind(),
                kept = %kept.id(),
                dropped = %step.id(),
                "Dropping duplicate persisted step"
            );
            continue;
        }

        by_kind.insert(step.kind(), step);
    }

    definition
        .step_order()
        .iter()
        .map(|kind| match by_kind.remove(kind) {
            Some(step) => StepRecord::Materialized(step),
            None => StepRecord::placeholder(*kind),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::step::{StepId, StepStatus};

    fn persisted(kind: StepKind) -> PersistedStep {
        PersistedStep::new(StepId::generate(), kind)
    }

    #[test]
    fn test_empty_input_yields_all_virtual() {
        for workflow in [WorkflowKind::GridConnection, WorkflowKind::MicroInstallation] {
            let records = reconcile(workflow, Vec::new());
            let order = WorkflowDefinition::for_kind(workflow).step_order();

            assert_eq!(records.len(), order.len());
            for (record, kind) in records.iter().zip(order) {
                assert!(record.is_virtual());
                assert_eq!(record.kind(), *kind);
            }
        }
    }

    #[test]
    fn test_persisted_steps_win_over_placeholders() {
        let assessment = persisted(StepKind::TechnicalAssessment).with_status(StepStatus::Approved);
        let assessment_id = assessment.id().clone();

        let records = reconcile(WorkflowKind::MicroInstallation, vec![assessment]);

        assert_eq!(records.len(), 5);
        assert!(records[0].is_virtual());
        assert_eq!(records[0].kind(), StepKind::ApplicationSubmission);

        assert!(records[1].is_materialized());
        assert_eq!(records[1].kind(), StepKind::TechnicalAssessment);
        assert_eq!(records[1].status(), StepStatus::Approved);
        assert_eq!(records[1].id(), Some(&assessment_id));

        assert!(records[2..].iter().all(|r| r.is_virtual()));
    }

    #[test]
    fn test_output_follows_definition_order_not_input_order() {
        let records = reconcile(
            WorkflowKind::GridConnection,
            vec![
                persisted(StepKind::GridActivation),
                persisted(StepKind::ApplicationSubmission),
                persisted(StepKind::DesignApproval),
            ],
        );

        let kinds: Vec<StepKind> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            WorkflowDefinition::for_kind(WorkflowKind::GridConnection).step_order()
        );
    }

    #[test]
    fn test_unknown_kinds_are_dropped() {
        // ConnectionConditions belongs to the grid-connection order only;
        // inside a micro-installation notification it is a stale leftover.
        let records = reconcile(
            WorkflowKind::MicroInstallation,
            vec![
                persisted(StepKind::ApplicationSubmission),
                persisted(StepKind::ConnectionConditions),
            ],
        );

        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.kind() != StepKind::ConnectionConditions));
        assert!(records[0].is_materialized());
    }

    #[test]
    fn test_duplicate_kind_first_arrival_wins() {
        let first = persisted(StepKind::MeterInstallation).with_status(StepStatus::Approved);
        let first_id = first.id().clone();
        let second = persisted(StepKind::MeterInstallation).with_status(StepStatus::Rejected);

        let records = reconcile(WorkflowKind::MicroInstallation, vec![first, second]);

        let meter = records
            .iter()
            .find(|r| r.kind() == StepKind::MeterInstallation)
            .unwrap();
        assert_eq!(meter.id(), Some(&first_id));
        assert_eq!(meter.status(), StepStatus::Approved);
    }

    #[test]
    fn test_reconcile_is_idempotent_on_persisted_state() {
        let steps = vec![
            persisted(StepKind::ApplicationSubmission).with_status(StepStatus::Approved),
            persisted(StepKind::TechnicalAssessment),
        ];

        let first = reconcile(WorkflowKind::MicroInstallation, steps.clone());
        let second = reconcile(WorkflowKind::MicroInstallation, steps);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.status(), b.status());
            assert_eq!(a.is_materialized(), b.is_materialized());
            assert_eq!(a.id(), b.id());
        }

        // Placeholder markers are client-only and fresh per call
        let markers = |records: &[StepRecord]| {
            records
                .iter()
                .filter_map(|r| match r {
                    StepRecord::Virtual(v) => Some(v.marker()),
                    StepRecord::Materialized(_) => None,
                })
                .collect::<Vec<_>>()
        };
        assert_ne!(markers(&first), markers(&second));
    }
}
