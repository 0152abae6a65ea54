use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RestaurantId(pub String);

/// Full directory record as held by the restaurant store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub category: String,
    pub address: String,
    pub city: String,
    pub zipcode: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub review_count: u32,
    pub rating: Decimal,
    pub inserted_at: DateTime<Utc>,
}

impl Restaurant {
    /// Short form remembered per user for "remind me" requests.
    pub fn headline(&self) -> String {
        format!("{}, {}", self.name, self.address)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRecommendation {
    pub user_id: String,
    pub summary: String,
    pub recorded_at: DateTime<Utc>,
}
