use crate::config::Config;
use crate::session::ConsultationSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active consultation sessions (consultation_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<ConsultationSession>>>>,

    /// Service configuration (streaming backend credentials, audio format)
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }
}
