//! Workflow domain module
//!
//! Static vocabulary of the regulatory notification process: workflow
//! variants, step kinds, and the per-variant step orders with their
//! expected document types. Definitions are fixed at compile time; all
//! per-notification state lives in
//! [`notification`](crate::domain::notification).

mod definition;
mod error;
mod kinds;

pub use definition::WorkflowDefinition;
pub use error::WorkflowError;
pub use kinds::{StepKind, WorkflowKind};
