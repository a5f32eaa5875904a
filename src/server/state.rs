use std::sync::Arc;

use crate::{config::Config, db::Database};

use super::session::SessionStore;

pub struct AppState {
    pub config: Config,
    pub db: Arc<Database>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, db: Arc<Database>) -> Arc<Self> {
        let sessions = SessionStore::new(config.session_max_age);

        Arc::new(Self {
            config,
            db,
            sessions,
        })
    }
}
