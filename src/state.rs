use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{jwt::JwtKeys, repo::PgUserStore, repo::UserStore};
use crate::config::AppConfig;
use crate::todos::repo::{PgTaskStore, TaskStore};

/// Everything a request handler can reach. Built once in `main`; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(config: AppConfig, db: PgPool) -> Self {
        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let tasks = Arc::new(PgTaskStore::new(db)) as Arc<dyn TaskStore>;
        Self::from_parts(Arc::new(config), users, tasks)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config,
            keys,
            users,
            tasks,
        }
    }
}
