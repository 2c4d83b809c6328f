use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::{AppConfig, ServerConfig, MEMORY_DATABASE_URL};
use crate::users::repo::{InMemoryUserRepo, PgUserRepo, UserRepo};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn UserRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Self::from_config(config).await
    }

    pub async fn from_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        if config.uses_memory_store() {
            tracing::warn!("DATABASE_URL=memory; users are kept in process and lost on exit");
            return Ok(Self::from_parts(Arc::new(InMemoryUserRepo::new()), config));
        }

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let repo = Arc::new(PgUserRepo::new(db)) as Arc<dyn UserRepo>;
        Ok(Self::from_parts(repo, config))
    }

    pub fn from_parts(repo: Arc<dyn UserRepo>, config: Arc<AppConfig>) -> Self {
        Self { repo, config }
    }

    pub fn with_repo(self, repo: Arc<dyn UserRepo>) -> Self {
        Self { repo, ..self }
    }

    /// Empty in-memory store with default settings.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: MEMORY_DATABASE_URL.into(),
            max_connections: 1,
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
        });
        Self::from_parts(Arc::new(InMemoryUserRepo::new()), config)
    }
}
