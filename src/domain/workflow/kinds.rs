//! Workflow and step kind vocabulary

use std::fmt;

use serde::{Deserialize, Serialize};

/// Regulatory notification workflow variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Full grid-connection procedure for standard installations
    GridConnection,

    /// Simplified notification procedure for micro-installations
    MicroInstallation,
}

impl WorkflowKind {
    /// Human-readable name for UI and log output
    pub fn label(&self) -> &'static str {
        match self {
            Self::GridConnection => "Grid connection",
            Self::MicroInstallation => "Micro-installation",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridConnection => write!(f, "grid_connection"),
            Self::MicroInstallation => write!(f, "micro_installation"),
        }
    }
}

/// Kind of a workflow step
///
/// Closed union over both workflow variants. Which kinds apply to a given
/// notification, and in what order, is defined by
/// [`WorkflowDefinition`](super::WorkflowDefinition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Application filed with the grid operator
    ApplicationSubmission,

    /// Operator's opinion on connection feasibility
    ConnectionOpinion,

    /// Technical connection conditions issued by the operator
    ConnectionConditions,

    /// Signed connection agreement
    ConnectionAgreement,

    /// Installation design reviewed and approved
    DesignApproval,

    /// Physical installation works
    InstallationWorks,

    /// Operator's technical assessment (micro-installation procedure)
    TechnicalAssessment,

    /// On-site inspection of the finished installation
    InstallationInspection,

    /// Meter installed by the operator
    MeterInstallation,

    /// Installation energized and connected to the grid
    GridActivation,
}

impl StepKind {
    /// Human-readable name for UI and log output
    pub fn label(&self) -> &'static str {
        match self {
            Self::ApplicationSubmission => "Application submission",
            Self::ConnectionOpinion => "Connection opinion",
            Self::ConnectionConditions => "Connection conditions",
            Self::ConnectionAgreement => "Connection agreement",
            Self::DesignApproval => "Design approval",
            Self::InstallationWorks => "Installation works",
            Self::TechnicalAssessment => "Technical assessment",
            Self::InstallationInspection => "Installation inspection",
            Self::MeterInstallation => "Meter installation",
            Self::GridActivation => "Grid activation",
        }
    }

    /// Document type labels expected at this step
    ///
    /// Informational for attachment pickers; attaching a document with an
    /// undeclared label is allowed. The list is never empty and always ends
    /// with the generic fallback label.
    pub fn document_types(&self) -> &'static [&'static str] {
        match self {
            Self::ApplicationSubmission => &[
                "Connection application",
                "Title deed or land-use consent",
                "Site plan",
                "Other",
            ],
            Self::ConnectionOpinion => &["Connection opinion", "Other"],
            Self::ConnectionConditions => &["Connection conditions", "Other"],
            Self::ConnectionAgreement => &["Connection agreement", "Other"],
            Self::DesignApproval => &["Installation design", "Design approval", "Other"],
            Self::InstallationWorks => &[
                "Works completion certificate",
                "Cable routing plan",
                "Other",
            ],
            Self::TechnicalAssessment => &["Technical assessment report", "Other"],
            Self::InstallationInspection => &["Inspection protocol", "Measurement report", "Other"],
            Self::MeterInstallation => &["Meter installation report", "Other"],
            Self::GridActivation => &[
                "Activation confirmation",
                "Power delivery contract",
                "Other",
            ],
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicationSubmission => write!(f, "application_submission"),
            Self::ConnectionOpinion => write!(f, "connection_opinion"),
            Self::ConnectionConditions => write!(f, "connection_conditions"),
            Self::ConnectionAgreement => write!(f, "connection_agreement"),
            Self::DesignApproval => write!(f, "design_approval"),
            Self::InstallationWorks => write!(f, "installation_works"),
            Self::TechnicalAssessment => write!(f, "technical_assessment"),
            Self::InstallationInspection => write!(f, "installation_inspection"),
            Self::MeterInstallation => write!(f, "meter_installation"),
            Self::GridActivation => write!(f, "grid_activation"),
        }
    }
}
