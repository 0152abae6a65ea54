use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};
use uuid::Uuid;

use dinebot_core::domain::dialog::DialogResponse;
use dinebot_core::errors::{ApplicationError, InterfaceError};
use dinebot_dialog::{
    ChatReply, ChatRequest, CodeHookEvent, FrontDoor, IntentContext, IntentDispatcher,
};
use dinebot_jobs::{DispatchOutcome, Worker};

pub const CORRELATION_HEADER: &str = "x-correlation-id";
pub const USER_HEADER: &str = "x-dinebot-user";

#[derive(Clone)]
pub struct ApiState {
    pub front_door: Arc<FrontDoor>,
    pub dispatcher: Arc<IntentDispatcher>,
    pub worker: Arc<Worker>,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::OPTIONS, Method::POST, Method::GET]);

    let chat_routes = Router::new().route("/chat", post(chat)).layer(cors);

    Router::new()
        .route("/dialog", post(dialog))
        .route("/worker/dispatch", post(dispatch))
        .merge(chat_routes)
        .with_state(state)
}

pub struct ApiError(InterfaceError);

impl ApiError {
    fn new(error: impl Into<ApplicationError>, correlation_id: &str) -> Self {
        Self(error.into().into_interface(correlation_id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(
                event_name = "api.request.failed",
                correlation_id = %self.0.correlation_id(),
                status = status.as_u16(),
                error = %self.0,
                "request failed"
            );
        } else {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %self.0.correlation_id(),
                error = %self.0,
                "request rejected"
            );
        }

        let body = json!({
            "error": self.0.user_message(),
            "correlation_id": self.0.correlation_id(),
        });
        (status, Json(body)).into_response()
    }
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

async fn chat(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ChatReply>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let request =
        ChatRequest::from_json(&body).map_err(|error| ApiError::new(error, &correlation_id))?;
    let user_id = headers.get(USER_HEADER).and_then(|value| value.to_str().ok());

    let reply = state
        .front_door
        .handle(&request, user_id, &correlation_id)
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    Ok(Json(reply))
}

async fn dialog(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<DialogResponse>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let event =
        CodeHookEvent::from_json(&body).map_err(|error| ApiError::new(error, &correlation_id))?;

    let response = state
        .dispatcher
        .dispatch(&event, &IntentContext { correlation_id: correlation_id.clone() })
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    Ok(Json(response))
}

async fn dispatch(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<DispatchOutcome>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let outcome = state
        .worker
        .dispatch_once(&correlation_id)
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    Ok(Json(outcome))
}
