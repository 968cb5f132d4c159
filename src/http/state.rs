use std::sync::Arc;

use crate::session::{ReconcileConfig, SessionConfig, SessionCoordinator};
use crate::store::MeetingStore;
use crate::upstream::{RealtimeOptions, UpstreamConnector};

/// Shared application state for HTTP and WebSocket handlers.
#[derive(Clone)]
pub struct AppState {
    pub session_config: SessionConfig,
    pub reconcile_config: ReconcileConfig,
    pub options: RealtimeOptions,
    pub store: MeetingStore,
    pub connector: Arc<dyn UpstreamConnector>,
}

impl AppState {
    /// Build a coordinator for one incoming producer connection.
    pub fn coordinator(&self) -> SessionCoordinator {
        SessionCoordinator::new(
            self.session_config.clone(),
            self.reconcile_config.clone(),
            self.options.clone(),
            self.store.clone(),
            Arc::clone(&self.connector),
        )
    }
}
