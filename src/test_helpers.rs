use std::sync::Arc;

use axum::Router;

use crate::{config::AppConfig, db::MemoryTodoStore, routes::app, state::AppState};

/// State backed by a fresh in-memory store and default config.
pub fn test_state() -> Arc<AppState> {
    AppState::new(AppConfig::default(), Arc::new(MemoryTodoStore::new()))
}

pub fn test_router() -> Router {
    app(test_state())
}
