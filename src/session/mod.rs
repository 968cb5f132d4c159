//! Session lifecycle and transcript reconciliation.
//!
//! The `SessionCoordinator` owns one transcription run end to end:
//! handshake, audio pipeline, recognition-event processing, the
//! stop/drain protocol, and finalization of the durable artifacts.

mod config;
mod coordinator;
mod reconcile;

pub use config::SessionConfig;
pub use coordinator::{SessionCoordinator, SessionOutcome};
pub use reconcile::{ReconcileConfig, ReconciliationEngine};
