use std::sync::Arc;

use crate::{
    admin::AdminRegistry,
    config::AppConfig,
    db::{DbPool, OrmConn, shared_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub admin: Arc<AdminRegistry>,
}

impl AppState {
    pub fn new(orm: OrmConn, config: AppConfig) -> Self {
        Self {
            pool: shared_pool(&orm),
            orm,
            config: Arc::new(config),
            admin: Arc::new(AdminRegistry::standard()),
        }
    }
}
