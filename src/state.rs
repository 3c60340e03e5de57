use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::warn;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
}

const CONNECT_ATTEMPTS: u32 = 10;

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = connect_with_retry(&config.database_url).await?;
        Ok(Self { db, config })
    }

}

/// The database container may still be starting when the API comes up.
async fn connect_with_retry(database_url: &str) -> anyhow::Result<PgPool> {
    let mut attempt = 1u32;
    loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(error = %e, attempt, "database unavailable, retrying");
                tokio::time::sleep(Duration::from_secs(1)).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).context("connect to database");
            }
        }
    }
}
