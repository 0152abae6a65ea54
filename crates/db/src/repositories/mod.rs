use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use dinebot_core::config::QueueConfig;
use dinebot_core::domain::restaurant::{LastRecommendation, Restaurant, RestaurantId};
use dinebot_core::domain::work_item::{MessageId, ReceiptHandle, ReceivedMessage, WorkItem};

pub mod memory;
pub mod recommendation;
pub mod restaurant;
pub mod work_queue;

pub use memory::{InMemoryRecommendationStore, InMemoryRestaurantStore, InMemoryWorkQueue};
pub use recommendation::SqlRecommendationStore;
pub use restaurant::SqlRestaurantStore;
pub use work_queue::SqlWorkQueue;

use crate::DbPool;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// At-least-once queue carrying dining requests from fulfillment to the worker.
///
/// A received message stays hidden for the queue's visibility timeout and then
/// becomes receivable again unless it was deleted with its latest receipt handle.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn send(&self, item: &WorkItem) -> Result<MessageId, RepositoryError>;

    async fn receive(&self, max_messages: u32) -> Result<Vec<ReceivedMessage>, RepositoryError>;

    /// Returns `false` when the handle is stale or the message is already gone.
    async fn delete(&self, receipt: &ReceiptHandle) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Inserts or replaces the record with the same id.
    async fn put(&self, restaurant: Restaurant) -> Result<(), RepositoryError>;

    /// Unknown ids are skipped; result order is unspecified.
    async fn batch_get(&self, ids: &[RestaurantId]) -> Result<Vec<Restaurant>, RepositoryError>;

    async fn search_category(
        &self,
        category: &str,
        limit: u32,
    ) -> Result<Vec<RestaurantId>, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait RecommendationStore: Send + Sync {
    async fn last_recommendation(
        &self,
        user_id: &str,
    ) -> Result<Option<LastRecommendation>, RepositoryError>;

    async fn record(
        &self,
        user_id: &str,
        summary: &str,
    ) -> Result<LastRecommendation, RepositoryError>;
}

/// The three backends every runtime surface shares.
#[derive(Clone)]
pub struct Stores {
    pub queue: Arc<dyn WorkQueue>,
    pub restaurants: Arc<dyn RestaurantStore>,
    pub recommendations: Arc<dyn RecommendationStore>,
}

impl Stores {
    pub fn sql(pool: DbPool, queue: &QueueConfig) -> Self {
        Self {
            queue: Arc::new(SqlWorkQueue::new(
                pool.clone(),
                &queue.name,
                queue.visibility_timeout_secs,
            )),
            restaurants: Arc::new(SqlRestaurantStore::new(pool.clone())),
            recommendations: Arc::new(SqlRecommendationStore::new(pool)),
        }
    }

    pub fn in_memory(queue: &QueueConfig) -> Self {
        Self {
            queue: Arc::new(InMemoryWorkQueue::new(queue.visibility_timeout_secs)),
            restaurants: Arc::new(InMemoryRestaurantStore::default()),
            recommendations: Arc::new(InMemoryRecommendationStore::default()),
        }
    }
}
