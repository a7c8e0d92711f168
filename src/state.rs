use std::sync::Arc;

use coursebyte_config::CorsConfig;
use coursebyte_db::Repository;

/// Shared handler state. The repository is a trait object so the same
/// router runs against PostgreSQL in production and memory in tests.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new<R>(repo: R, cors_config: CorsConfig) -> Self
    where
        R: Repository + 'static,
    {
        Self {
            repo: Arc::new(repo),
            cors_config,
        }
    }
}
