//! Infrastructure layer - store implementations and services

pub mod document;
pub mod logging;
pub mod notification;
pub mod services;
