use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use dinebot_core::config::DialogConfig;
use dinebot_core::errors::ClientError;

const SERVICE: &str = "dialog engine";
pub const UNAVAILABLE_REPLY: &str = "Sorry, I can't chat right now. Please try again later.";

/// What the managed dialog engine said back to a user utterance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub intent_name: Option<String>,
    #[serde(default)]
    pub dialog_state: Option<String>,
}

#[async_trait]
pub trait DialogEngine: Send + Sync {
    async fn post_text(&self, user_id: &str, input_text: &str)
        -> Result<EngineReply, ClientError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostTextRequest<'a> {
    input_text: &'a str,
    session_attributes: Map<String, Value>,
}

/// Runtime client for the hosted bot's `post_text` operation.
#[derive(Clone)]
pub struct HttpDialogEngine {
    client: Client,
    runtime_url: String,
    bot_name: String,
    bot_alias: String,
    api_key: Option<SecretString>,
}

impl HttpDialogEngine {
    pub fn new(
        client: Client,
        runtime_url: impl Into<String>,
        bot_name: impl Into<String>,
        bot_alias: impl Into<String>,
    ) -> Self {
        Self {
            client,
            runtime_url: runtime_url.into(),
            bot_name: bot_name.into(),
            bot_alias: bot_alias.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// `None` when no runtime endpoint is configured.
    pub fn from_config(client: Client, config: &DialogConfig) -> Option<Self> {
        let runtime_url = config.runtime_url.as_deref()?;
        let engine = Self::new(client, runtime_url, &config.bot_name, &config.bot_alias);
        Some(match &config.api_key {
            Some(api_key) => engine.with_api_key(api_key.clone()),
            None => engine,
        })
    }

    fn text_url(&self, user_id: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.runtime_url).map_err(|error| ClientError::Transport {
            service: SERVICE,
            detail: format!("invalid runtime url `{}`: {error}", self.runtime_url),
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| ClientError::Transport {
                service: SERVICE,
                detail: format!("runtime url `{}` cannot carry a path", self.runtime_url),
            })?;
            segments.pop_if_empty().extend([
                "bot",
                self.bot_name.as_str(),
                "alias",
                self.bot_alias.as_str(),
                "user",
                user_id,
                "text",
            ]);
        }
        Ok(url)
    }
}

#[async_trait]
impl DialogEngine for HttpDialogEngine {
    async fn post_text(
        &self,
        user_id: &str,
        input_text: &str,
    ) -> Result<EngineReply, ClientError> {
        let url = self.text_url(user_id)?;
        debug!(
            event_name = "dialog.engine.post_text",
            bot = %self.bot_name,
            user_id,
            "posting text"
        );

        let mut request = self
            .client
            .post(url)
            .json(&PostTextRequest { input_text, session_attributes: Map::new() });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|error| ClientError::Transport {
            service: SERVICE,
            detail: error.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { service: SERVICE, status: status.as_u16(), body });
        }

        response
            .json::<EngineReply>()
            .await
            .map_err(|error| ClientError::Decode { service: SERVICE, detail: error.to_string() })
    }
}

/// Stand-in used when no runtime endpoint is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDialogEngine;

#[async_trait]
impl DialogEngine for NoopDialogEngine {
    async fn post_text(
        &self,
        _user_id: &str,
        _input_text: &str,
    ) -> Result<EngineReply, ClientError> {
        Ok(EngineReply { message: Some(UNAVAILABLE_REPLY.to_owned()), ..EngineReply::default() })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use dinebot_core::errors::ClientError;

    use super::{DialogEngine, HttpDialogEngine, NoopDialogEngine, UNAVAILABLE_REPLY};

    fn engine(server: &MockServer) -> HttpDialogEngine {
        HttpDialogEngine::new(Client::new(), server.uri(), "SuggestRestaurant", "$LATEST")
    }

    #[tokio::test]
    async fn posts_text_to_the_bot_alias_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot/SuggestRestaurant/alias/$LATEST/user/user-1/text"))
            .and(header("authorization", "Bearer runtime-key"))
            .and(body_json(json!({"inputText": "hello", "sessionAttributes": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Hi there, how can I help?",
                "intentName": "GreetingIntent",
                "dialogState": "Fulfilled"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = engine(&server)
            .with_api_key("runtime-key".to_string().into())
            .post_text("user-1", "hello")
            .await
            .expect("post text");

        assert_eq!(reply.message.as_deref(), Some("Hi there, how can I help?"));
        assert_eq!(reply.intent_name.as_deref(), Some("GreetingIntent"));
        assert_eq!(reply.dialog_state.as_deref(), Some("Fulfilled"));
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("throttled"))
            .mount(&server)
            .await;

        let error = engine(&server).post_text("user-1", "hello").await.expect_err("status");
        assert_eq!(
            error,
            ClientError::Status {
                service: "dialog engine",
                status: 503,
                body: "throttled".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_reply_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let error = engine(&server).post_text("user-1", "hello").await.expect_err("decode");
        assert!(matches!(error, ClientError::Decode { service: "dialog engine", .. }));
    }

    #[tokio::test]
    async fn noop_engine_apologises() {
        let reply = NoopDialogEngine.post_text("user-1", "hello").await.expect("noop");
        assert_eq!(reply.message.as_deref(), Some(UNAVAILABLE_REPLY));
        assert_eq!(reply.intent_name, None);
    }
}
