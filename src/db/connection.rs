use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use super::{MemoryTodoStore, TodoStore, dao::DaoContext, providers};
use crate::config::{AppConfig, DatabaseConfig};

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = providers::default_registry()?.connect(cfg).await?;
    info!("syncing database schema from entities");
    db.get_schema_registry("todo_api::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}

/// SQL-backed store when a database is configured, in-memory otherwise.
pub async fn open_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn TodoStore>> {
    match cfg.database.as_ref() {
        Some(database) => {
            let db = connect(database).await?;
            Ok(Arc::new(DaoContext::new(&db).todo()))
        }
        None => {
            warn!("no database configured, todos are kept in memory and lost on restart");
            Ok(Arc::new(MemoryTodoStore::new()))
        }
    }
}
