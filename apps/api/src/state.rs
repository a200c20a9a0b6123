use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::store::StudentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend. Postgres in production, the in-memory store in tests.
    pub store: Arc<dyn StudentStore>,
    pub jwt: JwtVerifier,
}
