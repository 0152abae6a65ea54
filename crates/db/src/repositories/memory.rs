use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use dinebot_core::domain::restaurant::{LastRecommendation, Restaurant, RestaurantId};
use dinebot_core::domain::work_item::{
    MessageAttributes, MessageId, ReceiptHandle, ReceivedMessage, WorkItem, WORK_ITEM_BODY,
};

use super::{RecommendationStore, RepositoryError, RestaurantStore, WorkQueue};

const DEFAULT_VISIBILITY_TIMEOUT_SECS: u64 = 30;
const MAX_VISIBILITY_TIMEOUT_SECS: u64 = 43_200;

pub(crate) fn visibility_window(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_VISIBILITY_TIMEOUT_SECS) as i64)
}

struct StoredMessage {
    message_id: MessageId,
    body: String,
    attributes: MessageAttributes,
    receipt_handle: Option<ReceiptHandle>,
    receive_count: u32,
    visible_after: DateTime<Utc>,
}

pub struct InMemoryWorkQueue {
    visibility_timeout: Duration,
    messages: RwLock<Vec<StoredMessage>>,
}

impl InMemoryWorkQueue {
    pub fn new(visibility_timeout_secs: u64) -> Self {
        Self {
            visibility_timeout: visibility_window(visibility_timeout_secs),
            messages: RwLock::new(Vec::new()),
        }
    }

    /// Messages not yet deleted, visible or not.
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

impl Default for InMemoryWorkQueue {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_TIMEOUT_SECS)
    }
}

#[async_trait::async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn send(&self, item: &WorkItem) -> Result<MessageId, RepositoryError> {
        let message_id = MessageId(Uuid::new_v4().to_string());
        let mut messages = self.messages.write().await;
        messages.push(StoredMessage {
            message_id: message_id.clone(),
            body: WORK_ITEM_BODY.to_owned(),
            attributes: item.to_attributes(),
            receipt_handle: None,
            receive_count: 0,
            visible_after: Utc::now(),
        });
        Ok(message_id)
    }

    async fn receive(&self, max_messages: u32) -> Result<Vec<ReceivedMessage>, RepositoryError> {
        let now = Utc::now();
        let mut messages = self.messages.write().await;
        let received = messages
            .iter_mut()
            .filter(|message| message.visible_after <= now)
            .take(max_messages as usize)
            .map(|message| {
                let receipt_handle = ReceiptHandle(Uuid::new_v4().to_string());
                message.receipt_handle = Some(receipt_handle.clone());
                message.receive_count += 1;
                message.visible_after = now + self.visibility_timeout;
                ReceivedMessage {
                    message_id: message.message_id.clone(),
                    receipt_handle,
                    body: message.body.clone(),
                    attributes: message.attributes.clone(),
                    receive_count: message.receive_count,
                }
            })
            .collect();
        Ok(received)
    }

    async fn delete(&self, receipt: &ReceiptHandle) -> Result<bool, RepositoryError> {
        let mut messages = self.messages.write().await;
        let position = messages
            .iter()
            .position(|message| message.receipt_handle.as_ref() == Some(receipt));
        Ok(position.map(|index| messages.remove(index)).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryRestaurantStore {
    restaurants: RwLock<HashMap<String, Restaurant>>,
}

#[async_trait::async_trait]
impl RestaurantStore for InMemoryRestaurantStore {
    async fn put(&self, restaurant: Restaurant) -> Result<(), RepositoryError> {
        let mut restaurants = self.restaurants.write().await;
        restaurants.insert(restaurant.id.0.clone(), restaurant);
        Ok(())
    }

    async fn batch_get(&self, ids: &[RestaurantId]) -> Result<Vec<Restaurant>, RepositoryError> {
        let restaurants = self.restaurants.read().await;
        Ok(ids.iter().filter_map(|id| restaurants.get(&id.0).cloned()).collect())
    }

    async fn search_category(
        &self,
        category: &str,
        limit: u32,
    ) -> Result<Vec<RestaurantId>, RepositoryError> {
        let restaurants = self.restaurants.read().await;
        let mut matches: Vec<&Restaurant> = restaurants
            .values()
            .filter(|restaurant| restaurant.category.eq_ignore_ascii_case(category))
            .collect();
        matches.sort_by(|left, right| {
            right
                .rating
                .cmp(&left.rating)
                .then(right.review_count.cmp(&left.review_count))
                .then(left.id.cmp(&right.id))
        });
        Ok(matches
            .into_iter()
            .take(limit as usize)
            .map(|restaurant| restaurant.id.clone())
            .collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.restaurants.read().await.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryRecommendationStore {
    records: RwLock<HashMap<String, LastRecommendation>>,
}

#[async_trait::async_trait]
impl RecommendationStore for InMemoryRecommendationStore {
    async fn last_recommendation(
        &self,
        user_id: &str,
    ) -> Result<Option<LastRecommendation>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.get(user_id).cloned())
    }

    async fn record(
        &self,
        user_id: &str,
        summary: &str,
    ) -> Result<LastRecommendation, RepositoryError> {
        let record = LastRecommendation {
            user_id: user_id.to_owned(),
            summary: summary.to_owned(),
            recorded_at: Utc::now(),
        };
        let mut records = self.records.write().await;
        records.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }
}
