use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use super::registry::{DbProvider, DbProviderId, base_options};
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut options = base_options(cfg);
        // every pooled connection to :memory: opens its own empty database
        if is_in_memory(&cfg.url) {
            options.max_connections(1).min_connections(1);
        }
        Ok(Database::connect(options).await?)
    }

    async fn post_connect(&self, db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
        Ok(())
    }
}

fn is_in_memory(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    lowered.contains(":memory:") || lowered.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::{SqliteDbProvider, is_in_memory};
    use crate::db::providers::DbProvider;

    #[test]
    fn accepts_sqlite_urls_only() {
        let provider = SqliteDbProvider;

        assert!(provider.supports_url("sqlite://todos.db?mode=rwc"));
        assert!(provider.supports_url("SQLITE::memory:"));
        assert!(!provider.supports_url("postgres://localhost/todos"));
    }

    #[test]
    fn detects_in_memory_databases() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:todos?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://todos.db"));
    }
}
