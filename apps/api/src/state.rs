use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Postgres in production, in-memory for tests and local runs.
    pub store: Arc<dyn ResumeStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub config: Config,
}
