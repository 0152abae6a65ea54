use chrono::Utc;
use sqlx::Row;

use dinebot_core::domain::restaurant::LastRecommendation;

use super::restaurant::parse_timestamp;
use super::{RecommendationStore, RepositoryError};
use crate::DbPool;

#[derive(Clone)]
pub struct SqlRecommendationStore {
    pool: DbPool,
}

impl SqlRecommendationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecommendationStore for SqlRecommendationStore {
    async fn last_recommendation(
        &self,
        user_id: &str,
    ) -> Result<Option<LastRecommendation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, summary, recorded_at FROM last_recommendation WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(LastRecommendation {
                user_id: row.try_get("user_id")?,
                summary: row.try_get("summary")?,
                recorded_at: parse_timestamp("recorded_at", row.try_get("recorded_at")?)?,
            })
        })
        .transpose()
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

        sqlx::query(
            "INSERT INTO last_recommendation (user_id, summary, recorded_at)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                summary = excluded.summary,
                recorded_at = excluded.recorded_at",
        )
        .bind(&record.user_id)
        .bind(&record.summary)
        .bind(record.recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::SqlRecommendationStore;
    use crate::connect_with_settings;
    use crate::migrations;
    use crate::repositories::RecommendationStore;

    #[tokio::test]
    async fn sql_recommendation_store_overwrites_per_user() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let store = SqlRecommendationStore::new(pool);

        assert_eq!(store.last_recommendation("u1").await.expect("empty lookup"), None);

        store.record("u1", "Joe's Shanghai, 46 Bowery").await.expect("record");
        let latest = store.record("u1", "Nom Wah, 13 Doyers St").await.expect("overwrite");
        store.record("u2", "Carbone, 181 Thompson St").await.expect("other user");

        let found = store.last_recommendation("u1").await.expect("lookup").expect("present");
        assert_eq!(found.summary, "Nom Wah, 13 Doyers St");
        assert_eq!(found.recorded_at, latest.recorded_at);
    }
}
