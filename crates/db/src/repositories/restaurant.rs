use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};

use dinebot_core::domain::restaurant::{Restaurant, RestaurantId};

use super::{RepositoryError, RestaurantStore};
use crate::DbPool;

const SELECT_COLUMNS: &str = "SELECT
    id,
    name,
    category,
    address,
    city,
    zipcode,
    latitude,
    longitude,
    review_count,
    rating,
    inserted_at
 FROM restaurant";

#[derive(Clone)]
pub struct SqlRestaurantStore {
    pool: DbPool,
}

impl SqlRestaurantStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RestaurantStore for SqlRestaurantStore {
    async fn put(&self, restaurant: Restaurant) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO restaurant (
                id,
                name,
                category,
                address,
                city,
                zipcode,
                latitude,
                longitude,
                review_count,
                rating,
                inserted_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                address = excluded.address,
                city = excluded.city,
                zipcode = excluded.zipcode,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                review_count = excluded.review_count,
                rating = excluded.rating,
                inserted_at = excluded.inserted_at",
        )
        .bind(&restaurant.id.0)
        .bind(&restaurant.name)
        .bind(&restaurant.category)
        .bind(&restaurant.address)
        .bind(&restaurant.city)
        .bind(&restaurant.zipcode)
        .bind(restaurant.latitude.map(|value| value.to_string()))
        .bind(restaurant.longitude.map(|value| value.to_string()))
        .bind(i64::from(restaurant.review_count))
        .bind(restaurant.rating.to_string())
        .bind(restaurant.inserted_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn batch_get(&self, ids: &[RestaurantId]) -> Result<Vec<Restaurant>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        builder.push(" WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.0.clone());
        }
        separated.push_unseparated(")");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.into_iter().map(restaurant_from_row).collect()
    }

    async fn search_category(
        &self,
        category: &str,
        limit: u32,
    ) -> Result<Vec<RestaurantId>, RepositoryError> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id
             FROM restaurant
             WHERE category = lower(?)
             ORDER BY CAST(rating AS REAL) DESC, review_count DESC, id ASC
             LIMIT ?",
        )
        .bind(category)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(RestaurantId).collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM restaurant").fetch_one(&self.pool).await?;
        u64::try_from(count)
            .map_err(|_| RepositoryError::Decode(format!("negative restaurant count: {count}")))
    }
}

fn restaurant_from_row(row: SqliteRow) -> Result<Restaurant, RepositoryError> {
    Ok(Restaurant {
        id: RestaurantId(row.try_get("id")?),
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        zipcode: row.try_get("zipcode")?,
        latitude: parse_optional_decimal("latitude", row.try_get("latitude")?)?,
        longitude: parse_optional_decimal("longitude", row.try_get("longitude")?)?,
        review_count: parse_u32("review_count", row.try_get("review_count")?)?,
        rating: parse_decimal("rating", row.try_get("rating")?)?,
        inserted_at: parse_timestamp("inserted_at", row.try_get("inserted_at")?)?,
    })
}

fn parse_decimal(column: &str, value: String) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(&value).map_err(|error| {
        RepositoryError::Decode(format!("invalid decimal in `{column}`: `{value}` ({error})"))
    })
}

fn parse_optional_decimal(
    column: &str,
    value: Option<String>,
) -> Result<Option<Decimal>, RepositoryError> {
    value.map(|value| parse_decimal(column, value)).transpose()
}

fn parse_u32(column: &str, value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::Decode(format!(
            "invalid value for `{column}` (expected non-negative u32): {value}"
        ))
    })
}

pub(crate) fn parse_timestamp(
    column: &str,
    value: String,
) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value).map(|timestamp| timestamp.with_timezone(&Utc)).map_err(
        |error| {
            RepositoryError::Decode(format!("invalid timestamp in `{column}`: `{value}` ({error})"))
        },
    )
}
