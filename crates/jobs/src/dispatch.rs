use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use dinebot_core::domain::restaurant::RestaurantId;
use dinebot_core::domain::work_item::MessageId;
use dinebot_core::errors::{ApplicationError, ClientError, DomainError};
use dinebot_core::selection::{choose, RandomSource, ThreadRandom};
use dinebot_db::repositories::{RecommendationStore, RepositoryError, RestaurantStore, WorkQueue};

use crate::mailer::Mailer;
use crate::search::{SearchError, SearchIndex};
use crate::template;

/// Error value reported when the search index knows no restaurant for the cuisine.
pub const NO_MATCH_ERROR: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Nothing was visible on the queue.
    Idle,
    /// The message stays on the queue and is redelivered after its visibility timeout.
    NoMatches { message_id: MessageId, cuisine: String, error: &'static str },
    Delivered { message_id: MessageId, restaurant_id: RestaurantId, email: String },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("work queue failure: {0}")]
    Queue(#[source] RepositoryError),
    #[error("malformed work item: {0}")]
    Message(#[from] DomainError),
    #[error("search failure: {0}")]
    Search(#[from] SearchError),
    #[error("restaurant store failure: {0}")]
    Store(#[source] RepositoryError),
    #[error("search returned {hits} ids for `{cuisine}` but none are in the restaurant store")]
    RecordsMissing { cuisine: String, hits: usize },
    #[error("mail delivery failure: {0}")]
    Mail(#[from] ClientError),
}

impl From<DispatchError> for ApplicationError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::Message(error) => Self::Domain(error),
            DispatchError::Queue(error) | DispatchError::Store(error) => {
                Self::Persistence(error.to_string())
            }
            other => Self::Integration(other.to_string()),
        }
    }
}

/// One worker invocation: receive, search, fetch, pick, mail, delete.
pub struct Worker<R = ThreadRandom> {
    queue: Arc<dyn WorkQueue>,
    search: Arc<dyn SearchIndex>,
    restaurants: Arc<dyn RestaurantStore>,
    mailer: Arc<dyn Mailer>,
    recommendations: Arc<dyn RecommendationStore>,
    random: R,
}

impl Worker<ThreadRandom> {
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        search: Arc<dyn SearchIndex>,
        restaurants: Arc<dyn RestaurantStore>,
        mailer: Arc<dyn Mailer>,
        recommendations: Arc<dyn RecommendationStore>,
    ) -> Self {
        Self { queue, search, restaurants, mailer, recommendations, random: ThreadRandom }
    }
}

impl<R> Worker<R>
where
    R: RandomSource,
{
    pub fn with_random<S: RandomSource>(self, random: S) -> Worker<S> {
        Worker {
            queue: self.queue,
            search: self.search,
            restaurants: self.restaurants,
            mailer: self.mailer,
            recommendations: self.recommendations,
            random,
        }
    }

    /// Any error leaves the received message undeleted.
    pub async fn dispatch_once(
        &self,
        correlation_id: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut received = self.queue.receive(1).await.map_err(DispatchError::Queue)?;
        let Some(message) = received.pop() else {
            return Ok(DispatchOutcome::Idle);
        };
        let item = message.work_item()?;
        let cuisine = item.cuisine.to_lowercase();

        info!(
            event_name = "worker.message.received",
            correlation_id,
            message_id = %message.message_id.0,
            receipt_handle = %message.receipt_handle.0,
            receive_count = message.receive_count,
            cuisine = %cuisine,
            "received dining request"
        );

        let ids = self.search.search_category(&cuisine).await?;
        if ids.is_empty() {
            warn!(
                event_name = "worker.search.empty",
                correlation_id,
                message_id = %message.message_id.0,
                cuisine = %cuisine,
                "no restaurants matched; leaving message for redelivery"
            );
            return Ok(DispatchOutcome::NoMatches {
                message_id: message.message_id,
                cuisine,
                error: NO_MATCH_ERROR,
            });
        }

        let candidates = self.restaurants.batch_get(&ids).await.map_err(DispatchError::Store)?;
        let chosen = choose(&self.random, &candidates).ok_or_else(|| {
            DispatchError::RecordsMissing { cuisine: cuisine.clone(), hits: ids.len() }
        })?;

        self.mailer.send(&template::compose(&item, chosen)).await?;
        info!(
            event_name = "worker.mail.sent",
            correlation_id,
            message_id = %message.message_id.0,
            restaurant_id = %chosen.id.0,
            candidates = candidates.len(),
            "suggestion mailed"
        );

        let deleted =
            self.queue.delete(&message.receipt_handle).await.map_err(DispatchError::Queue)?;
        if !deleted {
            warn!(
                event_name = "worker.message.delete_stale",
                correlation_id,
                receipt_handle = %message.receipt_handle.0,
                "receipt handle expired before delete; message may be redelivered"
            );
        }

        if let Some(user_id) = item.user_id.as_deref() {
            if let Err(error) = self.recommendations.record(user_id, &chosen.headline()).await {
                warn!(
                    event_name = "worker.recommendation.record_failed",
                    correlation_id,
                    user_id,
                    error = %error,
                    "could not remember last recommendation"
                );
            }
        }

        Ok(DispatchOutcome::Delivered {
            message_id: message.message_id,
            restaurant_id: chosen.id.clone(),
            email: item.email,
        })
    }
}
