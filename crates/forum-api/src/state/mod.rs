//! Application state
//!
//! Holds the shared state for the Axum application: the service context
//! and the database pool the readiness probe checks.

use std::sync::Arc;

use forum_db::PgPool;
use forum_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    pool: PgPool,
}

impl AppState {
    pub fn new(service_context: ServiceContext, pool: PgPool) -> Self {
        Self {
            service_context: Arc::new(service_context),
            pool,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("pool_size", &self.pool.size())
            .finish()
    }
}
