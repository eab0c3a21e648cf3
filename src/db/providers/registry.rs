use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbProviderId {
    Postgres,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::Postgres => "postgres",
            DbProviderId::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DbProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(super) fn base_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .sqlx_logging(false);
    options
}

#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;
    fn supports_url(&self, url: &str) -> bool;
    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection>;
    async fn post_connect(&self, _db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        Ok(())
    }
}

pub struct DbProviders {
    providers: HashMap<DbProviderId, Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn DbProvider>) -> Result<Self> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn DbProvider>) -> Result<()> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            bail!("database provider already registered: {}", id.as_str());
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn provider_for_url(&self, url: &str) -> Result<Arc<dyn DbProvider>> {
        self.providers
            .values()
            .find(|provider| provider.supports_url(url))
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported database url '{}' (registered providers: {})",
                    redact_url(url),
                    self.registered()
                )
            })
    }

    fn registered(&self) -> String {
        let mut ids: Vec<_> = self.providers.keys().map(|id| id.as_str()).collect();
        ids.sort_unstable();
        if ids.is_empty() {
            return "none".to_string();
        }
        ids.join(", ")
    }

    /// Picks the provider for `cfg.url`, connects and runs its post-connect hook.
    pub async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let provider = self.provider_for_url(&cfg.url)?;
        info!(
            provider = %provider.id(),
            url = %redact_url(&cfg.url),
            "connecting to database"
        );
        let db = provider
            .connect(cfg)
            .await
            .with_context(|| format!("failed to connect to {} database", provider.id()))?;
        provider.post_connect(&db, cfg).await?;
        Ok(db)
    }
}

impl Default for DbProviders {
    fn default() -> Self {
        Self::new()
    }
}

fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use sea_orm::{DatabaseConnection, MockDatabase};

    use super::{DbProvider, DbProviderId, DbProviders, redact_url};
    use crate::{config::DatabaseConfig, db::providers::default_registry};

    struct TestProvider {
        id: DbProviderId,
        accepted_prefix: &'static str,
    }

    #[async_trait]
    impl DbProvider for TestProvider {
        fn id(&self) -> DbProviderId {
            self.id
        }

        fn supports_url(&self, url: &str) -> bool {
            url.starts_with(self.accepted_prefix)
        }

        async fn connect(&self, _cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
            Ok(MockDatabase::new(sea_orm::DatabaseBackend::Sqlite).into_connection())
        }
    }

    #[test]
    fn rejects_duplicate_provider_registration() {
        let provider = Arc::new(TestProvider {
            id: DbProviderId::Sqlite,
            accepted_prefix: "sqlite://",
        });
        let mut providers = DbProviders::new();

        providers
            .add(provider.clone())
            .expect("first provider registration should succeed");
        let err = providers
            .add(provider)
            .expect_err("duplicate provider registration should fail");

        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn resolves_provider_by_url() {
        let providers = DbProviders::new()
            .with_provider(Arc::new(TestProvider {
                id: DbProviderId::Postgres,
                accepted_prefix: "postgres://",
            }))
            .expect("postgres provider should register")
            .with_provider(Arc::new(TestProvider {
                id: DbProviderId::Sqlite,
                accepted_prefix: "sqlite://",
            }))
            .expect("sqlite provider should register");

        let sqlite = providers
            .provider_for_url("sqlite://./todos.db")
            .expect("sqlite provider should resolve");
        let postgres = providers
            .provider_for_url("postgres://localhost/todos")
            .expect("postgres provider should resolve");

        assert_eq!(sqlite.id(), DbProviderId::Sqlite);
        assert_eq!(postgres.id(), DbProviderId::Postgres);
    }

    #[tokio::test]
    async fn connects_through_matching_provider() {
        let providers = DbProviders::new()
            .with_provider(Arc::new(TestProvider {
                id: DbProviderId::Sqlite,
                accepted_prefix: "sqlite:",
            }))
            .expect("sqlite provider should register");
        let cfg = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        };

        providers
            .connect(&cfg)
            .await
            .expect("matching provider should connect");
    }

    #[test]
    fn redacts_credentials() {
        assert_eq!(
            redact_url("postgres://user:secret@db/todos"),
            "postgres://<redacted>"
        );
        assert_eq!(redact_url("no-scheme"), "<invalid-url>");
    }

    #[test]
    fn unsupported_scheme_lists_registered_providers() {
        let err = match default_registry()
            .expect("default providers should register")
            .provider_for_url("mysql://root:pw@localhost/todos")
        {
            Ok(_) => panic!("mysql urls have no provider"),
            Err(err) => err,
        };

        assert_eq!(
            err.to_string(),
            "unsupported database url 'mysql://<redacted>' (registered providers: postgres, sqlite)"
        );
    }

    #[test]
    fn empty_registry_reports_no_providers() {
        let err = match DbProviders::new().provider_for_url("sqlite::memory:") {
            Ok(_) => panic!("nothing is registered"),
            Err(err) => err,
        };

        assert!(err.to_string().ends_with("(registered providers: none)"));
    }
}
