use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use dinebot_core::config::DirectoryConfig;
use dinebot_core::errors::{ApplicationError, ClientError};
use dinebot_db::repositories::RestaurantStore;

use crate::directory::{DirectoryClient, DirectoryQuery};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("directory page `{category}` at offset {offset} failed: {source}")]
    Directory {
        category: String,
        offset: u32,
        #[source]
        source: ClientError,
    },
}

impl From<SeedError> for ApplicationError {
    fn from(value: SeedError) -> Self {
        Self::Integration(value.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CuisineReport {
    pub cuisine: String,
    pub pages: u32,
    pub listings: u32,
    pub stored: u32,
    pub failed: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub cuisines: Vec<CuisineReport>,
}

impl SeedReport {
    pub fn stored(&self) -> u32 {
        self.cuisines.iter().map(|report| report.stored).sum()
    }

    pub fn failed(&self) -> u32 {
        self.cuisines.iter().map(|report| report.failed).sum()
    }
}

/// Pages through the business directory and upserts every listing into the store.
pub struct Seeder {
    directory: Arc<dyn DirectoryClient>,
    store: Arc<dyn RestaurantStore>,
    location: String,
    page_size: u32,
    pages_per_cuisine: u32,
}

impl Seeder {
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        store: Arc<dyn RestaurantStore>,
        config: &DirectoryConfig,
    ) -> Self {
        Self {
            directory,
            store,
            location: config.location.clone(),
            page_size: config.page_size,
            pages_per_cuisine: config.pages_per_cuisine,
        }
    }

    /// Page failures abort the run; a listing that cannot be stored is logged and skipped.
    pub async fn seed(&self, cuisines: &[String]) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();
        for cuisine in cuisines {
            report.cuisines.push(self.seed_cuisine(cuisine).await?);
        }
        info!(
            event_name = "seeder.run.completed",
            cuisines = report.cuisines.len(),
            stored = report.stored(),
            failed = report.failed(),
            "directory seeding finished"
        );
        Ok(report)
    }

    async fn seed_cuisine(&self, cuisine: &str) -> Result<CuisineReport, SeedError> {
        let mut report = CuisineReport { cuisine: cuisine.to_owned(), ..CuisineReport::default() };

        for page in 0..self.pages_per_cuisine {
            let Some(offset) = page.checked_mul(self.page_size) else {
                warn!(
                    event_name = "seeder.paging.exhausted",
                    cuisine,
                    page,
                    page_size = self.page_size,
                    "directory offset no longer fits; stopping early"
                );
                break;
            };
            let query = DirectoryQuery {
                location: self.location.clone(),
                category: cuisine.to_owned(),
                limit: self.page_size,
                offset,
            };
            let businesses = self.directory.search(&query).await.map_err(|source| {
                SeedError::Directory { category: cuisine.to_owned(), offset, source }
            })?;
            report.pages += 1;
            report.listings += businesses.len() as u32;
            info!(
                event_name = "seeder.page.fetched",
                cuisine,
                offset,
                listings = businesses.len(),
                "directory page fetched"
            );

            for business in businesses {
                let id = business.id.clone();
                match self.store.put(business.into_restaurant(cuisine, Utc::now())).await {
                    Ok(()) => report.stored += 1,
                    Err(error) => {
                        report.failed += 1;
                        warn!(
                            event_name = "seeder.item.failed",
                            cuisine,
                            business_id = %id,
                            error = %error,
                            "could not store listing"
                        );
                    }
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use dinebot_core::config::AppConfig;
    use dinebot_core::domain::restaurant::{Restaurant, RestaurantId};
    use dinebot_core::errors::ClientError;
    use dinebot_db::repositories::{InMemoryRestaurantStore, RepositoryError, RestaurantStore};

    use super::{SeedError, Seeder};
    use crate::directory::{
        Business, BusinessCategory, BusinessLocation, Coordinates, DirectoryClient, DirectoryQuery,
    };

    /// Serves two listings per page until `fail_at_offset`.
    #[derive(Default)]
    struct PagedDirectory {
        fail_at_offset: Option<u32>,
        queries: Mutex<Vec<DirectoryQuery>>,
    }

    #[async_trait]
    impl DirectoryClient for PagedDirectory {
        async fn search(&self, query: &DirectoryQuery) -> Result<Vec<Business>, ClientError> {
            self.queries.lock().expect("queries lock").push(query.clone());
            if self.fail_at_offset == Some(query.offset) {
                return Err(ClientError::Status {
                    service: "business directory",
                    status: 429,
                    body: "slow down".to_string(),
                });
            }
            Ok((0..2)
                .map(|index| Business {
                    id: format!("{}-{}-{index}", query.category, query.offset),
                    name: format!("Listing {index}"),
                    categories: vec![BusinessCategory { alias: query.category.clone() }],
                    location: BusinessLocation {
                        address1: Some("1 Main St".to_string()),
                        city: Some("New York".to_string()),
                        zip_code: Some("10001".to_string()),
                    },
                    coordinates: Coordinates::default(),
                    review_count: 10,
                    rating: Decimal::new(45, 1),
                })
                .collect())
        }
    }

    /// Rejects every listing whose id ends in `-1`.
    #[derive(Default)]
    struct PickyStore {
        inner: InMemoryRestaurantStore,
    }

    #[async_trait]
    impl RestaurantStore for PickyStore {
        async fn put(&self, restaurant: Restaurant) -> Result<(), RepositoryError> {
            if restaurant.id.0.ends_with("-1") {
                return Err(RepositoryError::Decode("rejected".to_string()));
            }
            self.inner.put(restaurant).await
        }

        async fn batch_get(
            &self,
            ids: &[RestaurantId],
        ) -> Result<Vec<Restaurant>, RepositoryError> {
            self.inner.batch_get(ids).await
        }

        async fn search_category(
            &self,
            category: &str,
            limit: u32,
        ) -> Result<Vec<RestaurantId>, RepositoryError> {
            self.inner.search_category(category, limit).await
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            self.inner.count().await
        }
    }

    fn seeder(directory: Arc<PagedDirectory>, store: Arc<dyn RestaurantStore>) -> Seeder {
        let mut config = AppConfig::default().directory;
        config.pages_per_cuisine = 3;
        Seeder::new(directory, store, &config)
    }

    #[tokio::test]
    async fn pages_step_by_page_size_for_each_cuisine() {
        let directory = Arc::new(PagedDirectory::default());
        let store = Arc::new(InMemoryRestaurantStore::default());

        let report = seeder(directory.clone(), store.clone())
            .seed(&["indian".to_string(), "french".to_string()])
            .await
            .expect("seed");

        let offsets: Vec<(String, u32)> = directory
            .queries
            .lock()
            .expect("queries lock")
            .iter()
            .map(|query| (query.category.clone(), query.offset))
            .collect();
        assert_eq!(
            offsets,
            vec![
                ("indian".to_string(), 0),
                ("indian".to_string(), 50),
                ("indian".to_string(), 100),
                ("french".to_string(), 0),
                ("french".to_string(), 50),
                ("french".to_string(), 100),
            ]
        );
        assert!(directory.queries.lock().expect("queries lock").iter().all(|query| {
            query.limit == 50 && query.location == "New York"
        }));
        assert_eq!(report.stored(), 12);
        assert_eq!(report.cuisines[0].pages, 3);
        assert_eq!(store.count().await.expect("count"), 12);
    }

    #[tokio::test]
    async fn paging_stops_before_the_offset_overflows() {
        let directory = Arc::new(PagedDirectory::default());
        let store = Arc::new(InMemoryRestaurantStore::default());
        let mut config = AppConfig::default().directory;
        config.page_size = 1 << 31;
        config.pages_per_cuisine = 5;

        let report = Seeder::new(directory.clone(), store, &config)
            .seed(&["thai".to_string()])
            .await
            .expect("seed");

        let offsets: Vec<u32> = directory
            .queries
            .lock()
            .expect("queries lock")
            .iter()
            .map(|query| query.offset)
            .collect();
        assert_eq!(offsets, vec![0, 1 << 31]);
        assert_eq!(report.cuisines[0].pages, 2);
    }

    #[tokio::test]
    async fn item_failures_are_counted_and_skipped() {
        let directory = Arc::new(PagedDirectory::default());
        let store = Arc::new(PickyStore::default());

        let report =
            seeder(directory, store.clone()).seed(&["thai".to_string()]).await.expect("seed");

        assert_eq!(report.cuisines[0].listings, 6);
        assert_eq!(report.stored(), 3);
        assert_eq!(report.failed(), 3);
        assert_eq!(store.count().await.expect("count"), 3);
    }

    #[tokio::test]
    async fn page_failure_aborts_the_run() {
        let directory =
            Arc::new(PagedDirectory { fail_at_offset: Some(50), ..PagedDirectory::default() });
        let store = Arc::new(InMemoryRestaurantStore::default());

        let error = seeder(directory.clone(), store.clone())
            .seed(&["thai".to_string(), "indian".to_string()])
            .await
            .expect_err("page failure");

        assert!(matches!(error, SeedError::Directory { offset: 50, ref category, .. }
            if category == "thai"));
        assert_eq!(directory.queries.lock().expect("queries lock").len(), 2);
        assert_eq!(store.count().await.expect("count"), 2);
    }
}
