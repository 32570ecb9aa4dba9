use dashmap::DashMap;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::time::Instant;

use crate::gateway::dispatcher::Dispatcher;

/// Login attempts left for one access code.
#[derive(Clone)]
pub struct AttemptBucket {
    pub remaining: u32,
    pub last_refill: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub dispatcher: Arc<Dispatcher>,
    pub test_mode: bool,
    pub token_ttl_days: i64,
    pub login_attempts: Arc<DashMap<String, AttemptBucket>>,
}

impl AppState {
    pub fn new(db: SqlitePool, test_mode: bool, token_ttl_days: i64) -> Self {
        Self {
            db,
            dispatcher: Arc::new(Dispatcher::new()),
            test_mode,
            token_ttl_days,
            login_attempts: Arc::new(DashMap::new()),
        }
    }
}
