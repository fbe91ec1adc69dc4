//! Step records: persisted steps and virtual placeholders

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::document::{Document, DocumentId};
use crate::domain::error::StoreError;
use crate::domain::workflow::StepKind;

/// Regex pattern for valid step IDs: backend-assigned, opaque
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap());

/// Maximum length for step IDs
const MAX_ID_LENGTH: usize = 64;

/// Validated step identifier
///
/// Assigned by the backend when a step is materialized. The format is owned
/// by the backend; validation only rejects values that cannot be a backend
/// id at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(String);

impl StepId {
    /// Create a new validated step ID
    pub fn new(id: impl Into<String>) -> Result<Self, StoreError> {
        let id = id.into();
        validate_step_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a new step ID with UUID
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4();
        Self(format!("step-{}", uuid))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StepId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        id.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a step ID string
pub fn validate_step_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() {
        return Err(StoreError::validation("Step ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(StoreError::validation(format!(
            "Step ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(StoreError::validation(format!(
            "Invalid step ID '{}': must be alphanumeric with hyphens or underscores",
            id
        )));
    }

    Ok(())
}

/// Review status of a workflow step
///
/// Every transition between the three statuses is legal. Case officers
/// routinely revise decisions, so approval and rejection are both
/// re-enterable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Awaiting a decision from the grid operator
    #[default]
    Pending,

    /// Accepted by the grid operator
    Approved,

    /// Rejected; the step needs corrections and resubmission
    Rejected,
}

impl StepStatus {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A step that exists in the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedStep {
    /// Backend-assigned durable identifier
    id: StepId,

    /// Which step of the workflow this is
    kind: StepKind,

    /// Current review status
    status: StepStatus,

    /// Free-form notes from the case officer
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,

    /// Documents attached to this step
    #[serde(default)]
    documents: Vec<Document>,

    /// When the step was materialized
    created_at: DateTime<Utc>,

    /// When the step was last updated
    updated_at: DateTime<Utc>,
}

impl PersistedStep {
    /// Create a new persisted step with pending status
    pub fn new(id: StepId, kind: StepKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            status: StepStatus::Pending,
            notes: None,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // Builder methods

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    // Getters

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn has_document(&self, id: &DocumentId) -> bool {
        self.documents.iter().any(|d| d.id() == id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Setters (mutate and update timestamp)

    pub fn set_status(&mut self, status: StepStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.touch();
    }

    pub fn push_document(&mut self, document: Document) {
        self.documents.push(document);
        self.touch();
    }

    pub fn replace_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.touch();
    }

    /// Remove a document by ID, returning it if present
    pub fn remove_document(&mut self, id: &DocumentId) -> Option<Document> {
        let pos = self.documents.iter().position(|d| d.id() == id)?;
        let removed = self.documents.remove(pos);
        self.touch();
        Some(removed)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A step that exists only in the reconciled view
///
/// Synthesized for every step of the workflow order that has no backend
/// record yet. Carries no durable identity: the marker is regenerated on
/// every reconciliation and must never be sent to a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualStep {
    /// Client-only marker, fresh per reconciliation
    marker: Uuid,

    /// Which step of the workflow this is
    kind: StepKind,

    /// Status the step will be persisted with if materialized as-is
    status: StepStatus,

    /// Notes the step will be persisted with if materialized as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl VirtualStep {
    /// Create a new virtual placeholder for a step kind
    pub fn new(kind: StepKind) -> Self {
        Self {
            marker: Uuid::new_v4(),
            kind,
            status: StepStatus::Pending,
            notes: None,
        }
    }

    pub fn marker(&self) -> Uuid {
        self.marker
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// A step of a notification's reconciled workflow view
///
/// Virtual and materialized steps are distinct variants, so code touching a
/// durable [`StepId`] must prove the step exists in the backend first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepRecord {
    /// Placeholder with no backend record
    Virtual(VirtualStep),

    /// Backed by a persisted step
    Materialized(PersistedStep),
}

impl StepRecord {
    /// Create a virtual placeholder record
    pub fn placeholder(kind: StepKind) -> Self {
        Self::Virtual(VirtualStep::new(kind))
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Self::Virtual(step) => step.kind(),
            Self::Materialized(step) => step.kind(),
        }
    }

    pub fn status(&self) -> StepStatus {
        match self {
            Self::Virtual(step) => step.status(),
            Self::Materialized(step) => step.status(),
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            Self::Virtual(step) => step.notes(),
            Self::Materialized(step) => step.notes(),
        }
    }

    /// Documents attached to this step; always empty for virtual steps
    pub fn documents(&self) -> &[Document] {
        match self {
            Self::Virtual(_) => &[],
            Self::Materialized(step) => step.documents(),
        }
    }

    /// Durable step ID, if the step is materialized
    pub fn id(&self) -> Option<&StepId> {
        match self {
            Self::Virtual(_) => None,
            Self::Materialized(step) => Some(step.id()),
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized(_))
    }

    pub fn as_materialized(&self) -> Option<&PersistedStep> {
        match self {
            Self::Virtual(_) => None,
            Self::Materialized(step) => Some(step),
        }
    }

    pub fn as_materialized_mut(&mut self) -> Option<&mut PersistedStep> {
        match self {
            Self::Virtual(_) => None,
            Self::Materialized(step) => Some(step),
        }
    }
}
