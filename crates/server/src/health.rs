use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use dinebot_db::repositories::{RestaurantStore, SqlRestaurantStore, SqlWorkQueue};
use dinebot_db::DbPool;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    queue: SqlWorkQueue,
    restaurants: SqlRestaurantStore,
}

impl HealthState {
    pub fn new(db_pool: DbPool, queue_name: &str) -> Self {
        Self {
            queue: SqlWorkQueue::new(db_pool.clone(), queue_name, 0),
            restaurants: SqlRestaurantStore::new(db_pool),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub queue: HealthCheck,
    pub restaurants: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// An empty restaurant table is reported but does not make the service unready.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let queue = match state.queue.depth().await {
        Ok(depth) => HealthCheck {
            status: "ready",
            detail: format!("{depth} pending on `{}`", state.queue.queue_name()),
        },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    };
    let restaurants = match state.restaurants.count().await {
        Ok(0) => HealthCheck {
            status: "empty",
            detail: "no restaurants stored; run `dinebot seed`".to_string(),
        },
        Ok(count) => HealthCheck { status: "ready", detail: format!("{count} restaurants stored") },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    };

    let ready = queue.status == "ready" && restaurants.status != "degraded";
    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        queue,
        restaurants,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};
    use dinebot_db::{connect_with_settings, migrations};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn migrated_database_is_ready_even_before_seeding() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let (status, Json(payload)) = health(State(HealthState::new(pool.clone(), "Q1"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.queue.detail, "0 pending on `Q1`");
        assert_eq!(payload.restaurants.status, "empty");

        pool.close().await;
    }

    #[tokio::test]
    async fn closed_pool_is_degraded() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        pool.close().await;

        let (status, Json(payload)) = health(State(HealthState::new(pool, "Q1"))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.queue.status, "degraded");
    }
}
