use std::sync::Arc;

use dinebot_core::config::{AppConfig, ConfigError, LoadOptions};
use dinebot_core::validation::SystemClock;
use dinebot_db::{connect_with_config, migrations, DbPool, Stores};
use dinebot_dialog::{
    default_dispatcher, DialogEngine, FrontDoor, HttpDialogEngine, NoopDialogEngine,
};
use dinebot_jobs::{wiring, Worker};
use reqwest::Client;
use thiserror::Error;
use tracing::info;

use crate::api::ApiState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub worker: Arc<Worker>,
    pub api: ApiState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("http client setup failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database connected and migrations applied"
    );

    let client = Client::builder().build().map_err(BootstrapError::HttpClient)?;
    let stores = Stores::sql(db_pool.clone(), &config.queue);

    let engine: Arc<dyn DialogEngine> =
        match HttpDialogEngine::from_config(client.clone(), &config.dialog) {
            Some(engine) => Arc::new(engine),
            None => Arc::new(NoopDialogEngine),
        };
    info!(
        event_name = "system.bootstrap.dialog_engine",
        correlation_id = "bootstrap",
        mode = if config.dialog.runtime_url.is_some() { "http" } else { "noop" },
        bot = %config.dialog.bot_name,
        "dialog engine transport initialized"
    );

    let dispatcher = default_dispatcher(
        stores.queue.clone(),
        stores.recommendations.clone(),
        SystemClock::new(config.dialog.timezone),
    );
    let worker = Arc::new(wiring::worker(&config, &stores, client));
    let api = ApiState {
        front_door: Arc::new(FrontDoor::new(engine, &config.dialog.default_user_id)),
        dispatcher: Arc::new(dispatcher),
        worker: worker.clone(),
    };

    Ok(Application { config, db_pool, worker, api })
}

#[cfg(test)]
mod tests {
    use dinebot_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    fn overrides(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_invalid_database_url() {
        let result = bootstrap(overrides("postgres://localhost/dinebot")).await;

        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }

    #[tokio::test]
    async fn bootstrap_applies_migrations_and_wires_every_intent() {
        let app = bootstrap(overrides("sqlite::memory:?cache=shared")).await.expect("bootstrap");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('work_queue_message', 'restaurant', 'last_recommendation')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("count tables");
        assert_eq!(table_count, 3);
        assert_eq!(app.api.dispatcher.handler_count(), 4);

        let outcome = app.worker.dispatch_once("bootstrap-test").await.expect("dispatch");
        assert_eq!(outcome, dinebot_jobs::DispatchOutcome::Idle);

        app.db_pool.close().await;
    }
}
