use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use dinebot_core::errors::{ApplicationError, DomainError};

use crate::engine::DialogEngine;

pub const UNSTRUCTURED: &str = "unstructured";
pub const EMPTY_REPLY: &str = "Sorry, I didn't catch that. Could you say it again?";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unstructured {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type", default = "unstructured_type")]
    pub kind: String,
    pub unstructured: Unstructured,
}

fn unstructured_type() -> String {
    UNSTRUCTURED.to_owned()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw)
            .map_err(|error| DomainError::InvalidPayload(format!("chat request: {error}")))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage {
                kind: unstructured_type(),
                unstructured: Unstructured { id: None, text: text.into(), timestamp: None },
            }],
        }
    }

    /// Only the first message is forwarded.
    pub fn first(&self) -> Option<&Unstructured> {
        self.messages.first().map(|message| &message.unstructured)
    }
}

pub type ChatReply = ChatRequest;

impl ChatReply {
    fn reply(text: String) -> Self {
        Self {
            messages: vec![ChatMessage {
                kind: unstructured_type(),
                unstructured: Unstructured {
                    id: Some(Uuid::new_v4().to_string()),
                    text,
                    timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
                },
            }],
        }
    }
}

/// Stateless relay between the chat widget and the dialog engine.
pub struct FrontDoor {
    engine: Arc<dyn DialogEngine>,
    default_user_id: String,
}

impl FrontDoor {
    pub fn new(engine: Arc<dyn DialogEngine>, default_user_id: impl Into<String>) -> Self {
        Self { engine, default_user_id: default_user_id.into() }
    }

    /// `user_id` comes from the caller's session when it has one.
    pub async fn handle(
        &self,
        request: &ChatRequest,
        user_id: Option<&str>,
        correlation_id: &str,
    ) -> Result<ChatReply, ApplicationError> {
        let message = request.first().ok_or_else(|| {
            DomainError::InvalidPayload("chat request carries no messages".to_owned())
        })?;
        let user_id = user_id
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.default_user_id);

        info!(
            event_name = "front_door.chat.received",
            correlation_id,
            user_id,
            text_len = message.text.len(),
            "forwarding chat message"
        );

        let reply = self.engine.post_text(user_id, &message.text).await.map_err(|error| {
            warn!(
                event_name = "front_door.engine.failed",
                correlation_id,
                user_id,
                error = %error,
                "dialog engine call failed"
            );
            ApplicationError::from(error)
        })?;

        let text = reply.message.filter(|text| !text.is_empty()).unwrap_or_else(|| {
            EMPTY_REPLY.to_owned()
        });
        Ok(ChatReply::reply(text))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use dinebot_core::errors::{ApplicationError, ClientError, DomainError};

    use super::{ChatRequest, FrontDoor, EMPTY_REPLY, UNSTRUCTURED};
    use crate::engine::{DialogEngine, EngineReply};

    #[derive(Default)]
    struct RecordingEngine {
        reply: Option<String>,
        fail: bool,
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl DialogEngine for RecordingEngine {
        async fn post_text(
            &self,
            user_id: &str,
            input_text: &str,
        ) -> Result<EngineReply, ClientError> {
            let call = (user_id.to_owned(), input_text.to_owned());
            self.calls.lock().expect("calls lock").push(call);
            if self.fail {
                return Err(ClientError::Transport {
                    service: "dialog engine",
                    detail: "connection refused".to_owned(),
                });
            }
            Ok(EngineReply { message: self.reply.clone(), ..EngineReply::default() })
        }
    }

    #[tokio::test]
    async fn relays_first_message_and_wraps_the_reply() {
        let engine = Arc::new(RecordingEngine {
            reply: Some("Hi there, how can I help?".to_owned()),
            ..RecordingEngine::default()
        });
        let front_door = FrontDoor::new(engine.clone(), "anonymous");
        let request = ChatRequest::from_json(
            r#"{"messages": [{"type": "unstructured", "unstructured": {"text": "hello"}},
                             {"type": "unstructured", "unstructured": {"text": "ignored"}}]}"#,
        )
        .expect("parse");

        let reply = front_door.handle(&request, None, "corr-1").await.expect("reply");

        assert_eq!(
            engine.calls.lock().expect("calls lock").as_slice(),
            [("anonymous".to_owned(), "hello".to_owned())]
        );
        let encoded = serde_json::to_value(&reply).expect("encode");
        assert_eq!(encoded["messages"][0]["type"], json!(UNSTRUCTURED));
        let unstructured = &encoded["messages"][0]["unstructured"];
        assert_eq!(unstructured["text"], json!("Hi there, how can I help?"));
        assert!(unstructured["id"].is_string());
        assert!(unstructured["timestamp"].is_string());
    }

    #[tokio::test]
    async fn session_user_overrides_the_default() {
        let engine = Arc::new(RecordingEngine::default());
        let front_door = FrontDoor::new(engine.clone(), "anonymous");

        let reply = front_door
            .handle(&ChatRequest::text("thanks"), Some("user-7"), "corr-2")
            .await
            .expect("reply");

        assert_eq!(engine.calls.lock().expect("calls lock")[0].0, "user-7");
        assert_eq!(reply.first().map(|message| message.text.as_str()), Some(EMPTY_REPLY));
    }

    #[tokio::test]
    async fn empty_request_is_rejected_before_the_engine() {
        let engine = Arc::new(RecordingEngine::default());
        let front_door = FrontDoor::new(engine.clone(), "anonymous");

        let error = front_door
            .handle(&ChatRequest { messages: Vec::new() }, None, "corr-3")
            .await
            .expect_err("no messages");

        assert!(matches!(error, ApplicationError::Domain(DomainError::InvalidPayload(_))));
        assert!(engine.calls.lock().expect("calls lock").is_empty());
    }

    #[tokio::test]
    async fn engine_failure_is_an_integration_error() {
        let front_door =
            FrontDoor::new(Arc::new(RecordingEngine { fail: true, ..Default::default() }), "anon");

        let error = front_door
            .handle(&ChatRequest::text("hello"), None, "corr-4")
            .await
            .expect_err("engine down");

        assert!(matches!(error, ApplicationError::Integration(ref message)
            if message.contains("connection refused")));
    }
}
