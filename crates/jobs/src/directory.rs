use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use dinebot_core::config::{ConfigError, DirectoryConfig};
use dinebot_core::domain::restaurant::{Restaurant, RestaurantId};
use dinebot_core::errors::ClientError;

const SERVICE: &str = "business directory";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub location: String,
    pub category: String,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BusinessCategory {
    pub alias: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BusinessLocation {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
}

/// One listing from the directory's business search.
#[derive(Clone, Debug, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<BusinessCategory>,
    #[serde(default)]
    pub location: BusinessLocation,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub rating: Decimal,
}

impl Business {
    /// The first listed category wins; `fallback_category` covers listings without one.
    pub fn into_restaurant(
        self,
        fallback_category: &str,
        inserted_at: DateTime<Utc>,
    ) -> Restaurant {
        let category = self
            .categories
            .into_iter()
            .next()
            .map(|category| category.alias)
            .unwrap_or_else(|| fallback_category.to_owned());

        Restaurant {
            id: RestaurantId(self.id),
            name: self.name,
            category: category.to_lowercase(),
            address: self.location.address1.unwrap_or_default(),
            city: self.location.city.unwrap_or_default(),
            zipcode: self.location.zip_code.unwrap_or_default(),
            latitude: self.coordinates.latitude,
            longitude: self.coordinates.longitude,
            review_count: self.review_count,
            rating: self.rating,
            inserted_at,
        }
    }
}

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    businesses: Vec<Business>,
}

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn search(&self, query: &DirectoryQuery) -> Result<Vec<Business>, ClientError>;
}

/// Bearer-authenticated `GET {base}/businesses/search`.
#[derive(Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpDirectoryClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self { client, base_url: base_url.into(), api_key }
    }

    pub fn from_config(client: Client, config: &DirectoryConfig) -> Result<Self, ConfigError> {
        let api_key = SecretString::from(config.require_api_key()?.to_owned());
        Ok(Self::new(client, &config.base_url, api_key))
    }

    fn search_url(&self) -> String {
        format!("{}/businesses/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn search(&self, query: &DirectoryQuery) -> Result<Vec<Business>, ClientError> {
        let limit = query.limit.to_string();
        let offset = query.offset.to_string();
        let response = self
            .client
            .get(self.search_url())
            .bearer_auth(self.api_key.expose_secret())
            .query(&[
                ("location", query.location.as_str()),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
                ("categories", query.category.as_str()),
            ])
            .send()
            .await
            .map_err(|error| ClientError::Transport {
                service: SERVICE,
                detail: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { service: SERVICE, status: status.as_u16(), body });
        }

        let page = response
            .json::<SearchPage>()
            .await
            .map_err(|error| ClientError::Decode { service: SERVICE, detail: error.to_string() })?;
        Ok(page.businesses)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use reqwest::Client;
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use dinebot_core::config::AppConfig;
    use dinebot_core::errors::ClientError;

    use super::{DirectoryClient, DirectoryQuery, HttpDirectoryClient};

    fn query(offset: u32) -> DirectoryQuery {
        DirectoryQuery {
            location: "New York".to_string(),
            category: "chinese".to_string(),
            limit: 50,
            offset,
        }
    }

    #[tokio::test]
    async fn search_sends_paging_parameters_and_decodes_listings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/businesses/search"))
            .and(header("authorization", "Bearer directory-key"))
            .and(query_param("location", "New York"))
            .and(query_param("limit", "50"))
            .and(query_param("offset", "100"))
            .and(query_param("categories", "chinese"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "businesses": [{
                    "id": "nom-wah",
                    "name": "Nom Wah Tea Parlor",
                    "categories": [{"alias": "dimsum", "title": "Dim Sum"}],
                    "location": {
                        "address1": "13 Doyers St",
                        "city": "New York",
                        "zip_code": "10013"
                    },
                    "coordinates": {"latitude": 40.71436, "longitude": -73.99821},
                    "review_count": 2781,
                    "rating": 4.0
                }],
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = AppConfig::default().directory;
        config.base_url = format!("{}/v3", server.uri());
        config.api_key = Some("directory-key".to_string().into());
        let client = HttpDirectoryClient::from_config(Client::new(), &config).expect("client");

        let businesses = client.search(&query(100)).await.expect("search");
        assert_eq!(businesses.len(), 1);

        let restaurant = businesses[0].clone().into_restaurant("chinese", Utc::now());
        assert_eq!(restaurant.id.0, "nom-wah");
        assert_eq!(restaurant.category, "dimsum");
        assert_eq!(restaurant.zipcode, "10013");
        assert_eq!(restaurant.review_count, 2781);
        assert_eq!(restaurant.rating, Decimal::new(4, 0));
        assert_eq!(restaurant.latitude, Some(Decimal::new(4071436, 5)));
    }

    #[tokio::test]
    async fn listing_without_categories_uses_the_seed_cuisine() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "businesses": [{"id": "b1", "name": "Corner Spot", "location": {}}]
            })))
            .mount(&server)
            .await;

        let client =
            HttpDirectoryClient::new(Client::new(), server.uri(), "key".to_string().into());
        let businesses = client.search(&query(0)).await.expect("search");
        let restaurant = businesses[0].clone().into_restaurant("Chinese", Utc::now());

        assert_eq!(restaurant.category, "chinese");
        assert_eq!(restaurant.address, "");
        assert_eq!(restaurant.latitude, None);
    }

    #[tokio::test]
    async fn rate_limited_page_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client =
            HttpDirectoryClient::new(Client::new(), server.uri(), "key".to_string().into());
        let error = client.search(&query(0)).await.expect_err("429");
        assert!(matches!(error, ClientError::Status { status: 429, .. }));
    }

    #[test]
    fn client_needs_an_api_key() {
        let config = AppConfig::default().directory;
        assert!(HttpDirectoryClient::from_config(Client::new(), &config).is_err());
    }
}
