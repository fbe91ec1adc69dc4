//! Engine services over the store traits

pub mod documents;
pub mod steps;

pub use documents::{DocumentService, DocumentServiceConfig};
pub use steps::StepService;
