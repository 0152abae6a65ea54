use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use dinebot_core::config::{AppConfig, ConfigError, MailConfig, SearchConfig};
use dinebot_db::repositories::Stores;

use crate::directory::HttpDirectoryClient;
use crate::dispatch::Worker;
use crate::mailer::{HttpMailer, LogMailer, Mailer};
use crate::search::{HttpSearchIndex, SearchIndex, StoreSearchIndex};
use crate::seeder::Seeder;

/// Remote index when configured, otherwise the store's own category lookup.
pub fn search_index(
    config: &SearchConfig,
    stores: &Stores,
    client: Client,
) -> Arc<dyn SearchIndex> {
    match HttpSearchIndex::from_config(client, config) {
        Some(index) => {
            info!(
                event_name = "system.wiring.search",
                mode = "http",
                index = %config.index,
                "search index selected"
            );
            Arc::new(index)
        }
        None => {
            info!(event_name = "system.wiring.search", mode = "store", "search index selected");
            Arc::new(StoreSearchIndex::new(stores.restaurants.clone(), config.max_hits))
        }
    }
}

/// Mail API when configured, otherwise suggestions are only logged.
pub fn mailer(config: &MailConfig, client: Client) -> Arc<dyn Mailer> {
    match HttpMailer::from_config(client, config) {
        Ok(mailer) => {
            info!(
                event_name = "system.wiring.mail",
                mode = "http",
                sender = %config.sender,
                "mail transport selected"
            );
            Arc::new(mailer)
        }
        Err(_) => {
            info!(event_name = "system.wiring.mail", mode = "log", "mail transport selected");
            Arc::new(LogMailer::default())
        }
    }
}

pub fn worker(config: &AppConfig, stores: &Stores, client: Client) -> Worker {
    Worker::new(
        stores.queue.clone(),
        search_index(&config.search, stores, client.clone()),
        stores.restaurants.clone(),
        mailer(&config.mail, client),
        stores.recommendations.clone(),
    )
}

/// Fails when the directory api key is missing.
pub fn seeder(
    config: &AppConfig,
    stores: &Stores,
    client: Client,
) -> Result<Seeder, ConfigError> {
    let directory = HttpDirectoryClient::from_config(client, &config.directory)?;
    Ok(Seeder::new(Arc::new(directory), stores.restaurants.clone(), &config.directory))
}
