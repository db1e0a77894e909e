use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::repo::{PgUserRepository, UserRepository};
use crate::config::AppConfig;
use crate::sauces::repo::{PgSauceRepository, SauceRepository};
use crate::storage::{self, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub sauces: Arc<dyn SauceRepository>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        let storage = storage::from_config(&config.storage)
            .await
            .context("init image storage")?;

        Ok(Self {
            config: Arc::new(config),
            users: Arc::new(PgUserRepository::new(db.clone())),
            sauces: Arc::new(PgSauceRepository::new(db)),
            storage,
        })
    }
}
