//! Service Layer
//!
//! Orchestration between the HTTP handlers and the journal provider.

mod journal_service;

pub use journal_service::*;
