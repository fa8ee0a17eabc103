use std::sync::Arc;

use crate::assessment::Assessor;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup; read-only and shared by every request.
    pub assessor: Arc<Assessor>,
}
