use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use dinebot_core::domain::dialog::{DialogResponse, FulfillmentState};
use dinebot_core::errors::{ApplicationError, DomainError};
use dinebot_core::flows::{
    ConversationEvent, ConversationPhase, FlowContext, FlowEngine, FlowTransitionError,
    StaticReplyFlow,
};
use dinebot_core::validation::Clock;
use dinebot_db::repositories::{RecommendationStore, RepositoryError, WorkQueue};

use crate::dining::DiningSuggestionHandler;
use crate::payload::CodeHookEvent;

pub const GREETING_INTENT: &str = "GreetingIntent";
pub const THANK_YOU_INTENT: &str = "ThankYouIntent";
pub const REMIND_ME_INTENT: &str = "RemindMeIntent";
pub const DINING_SUGGESTIONS_INTENT: &str = "DiningSuggestionsIntent";

pub const GREETING_REPLY: &str = "Hi there, how can I help?";
pub const THANK_YOU_REPLY: &str = "No problem! It's my pleasure!";
pub const NO_RECORD_REPLY: &str = "Sorry I have no record given your information";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentContext {
    pub correlation_id: String,
}

impl Default for IntentContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Debug, Error)]
pub enum IntentError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<FlowTransitionError> for IntentError {
    fn from(value: FlowTransitionError) -> Self {
        Self::Domain(DomainError::from(value))
    }
}

impl From<IntentError> for ApplicationError {
    fn from(value: IntentError) -> Self {
        match value {
            IntentError::Domain(error) => Self::Domain(error),
            IntentError::Repository(error) => Self::Persistence(error.to_string()),
        }
    }
}

#[async_trait]
pub trait IntentHandler: Send + Sync {
    fn intent_name(&self) -> &'static str;
    async fn handle(
        &self,
        event: &CodeHookEvent,
        ctx: &IntentContext,
    ) -> Result<DialogResponse, IntentError>;
}

#[derive(Default)]
pub struct IntentDispatcher {
    handlers: HashMap<&'static str, Arc<dyn IntentHandler>>,
}

impl IntentDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: IntentHandler + 'static,
    {
        self.handlers.insert(handler.intent_name(), Arc::new(handler));
    }

    /// Unknown intents are fatal: the engine must not retry them.
    pub async fn dispatch(
        &self,
        event: &CodeHookEvent,
        ctx: &IntentContext,
    ) -> Result<DialogResponse, IntentError> {
        info!(
            event_name = "dialog.intent.dispatch",
            correlation_id = %ctx.correlation_id,
            user_id = event.user_id().unwrap_or("anonymous"),
            intent = event.intent_name(),
            invocation_source = ?event.invocation_source,
            bot = event.bot_name().unwrap_or("unknown"),
            "dispatching code hook invocation"
        );

        let Some(handler) = self.handlers.get(event.intent_name()) else {
            warn!(
                event_name = "dialog.intent.unsupported",
                correlation_id = %ctx.correlation_id,
                intent = event.intent_name(),
                "no handler registered for intent"
            );
            return Err(DomainError::UnsupportedIntent(event.intent_name().to_owned()).into());
        };

        handler.handle(event, ctx).await
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn intent_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

pub fn default_dispatcher<C>(
    queue: Arc<dyn WorkQueue>,
    recommendations: Arc<dyn RecommendationStore>,
    clock: C,
) -> IntentDispatcher
where
    C: Clock + 'static,
{
    let mut dispatcher = IntentDispatcher::new();
    dispatcher.register(StaticReplyHandler::greeting());
    dispatcher.register(StaticReplyHandler::thank_you());
    dispatcher.register(RemindMeHandler::new(recommendations));
    dispatcher.register(DiningSuggestionHandler::new(queue, clock));
    dispatcher
}

fn closed_reply(
    event: &CodeHookEvent,
    content: impl Into<String>,
) -> Result<DialogResponse, IntentError> {
    let engine = FlowEngine::new(StaticReplyFlow);
    let entry = ConversationPhase::entry_for(event.invocation_source);
    engine.apply(entry, ConversationEvent::ReplyReady, &FlowContext::default())?;
    Ok(DialogResponse::close(None, FulfillmentState::Fulfilled, content))
}

/// Intents answered with a fixed sentence.
pub struct StaticReplyHandler {
    intent: &'static str,
    reply: &'static str,
}

impl StaticReplyHandler {
    pub fn greeting() -> Self {
        Self { intent: GREETING_INTENT, reply: GREETING_REPLY }
    }

    pub fn thank_you() -> Self {
        Self { intent: THANK_YOU_INTENT, reply: THANK_YOU_REPLY }
    }
}

#[async_trait]
impl IntentHandler for StaticReplyHandler {
    fn intent_name(&self) -> &'static str {
        self.intent
    }

    async fn handle(
        &self,
        event: &CodeHookEvent,
        _ctx: &IntentContext,
    ) -> Result<DialogResponse, IntentError> {
        closed_reply(event, self.reply)
    }
}

pub struct RemindMeHandler {
    recommendations: Arc<dyn RecommendationStore>,
}

impl RemindMeHandler {
    pub fn new(recommendations: Arc<dyn RecommendationStore>) -> Self {
        Self { recommendations }
    }
}

#[async_trait]
impl IntentHandler for RemindMeHandler {
    fn intent_name(&self) -> &'static str {
        REMIND_ME_INTENT
    }

    async fn handle(
        &self,
        event: &CodeHookEvent,
        ctx: &IntentContext,
    ) -> Result<DialogResponse, IntentError> {
        let Some(user_id) = event.user_id() else {
            return closed_reply(event, NO_RECORD_REPLY);
        };

        match self.recommendations.last_recommendation(user_id).await? {
            Some(record) => {
                info!(
                    event_name = "dialog.remind_me.found",
                    correlation_id = %ctx.correlation_id,
                    user_id,
                    "returning last recommendation"
                );
                closed_reply(event, format!("Your last recommendation is {}", record.summary))
            }
            None => closed_reply(event, NO_RECORD_REPLY),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use dinebot_core::domain::dialog::{DialogAction, FulfillmentState, InvocationSource};
    use dinebot_core::domain::slots::SlotSet;
    use dinebot_core::errors::{ApplicationError, DomainError, InterfaceError};
    use dinebot_core::validation::FixedClock;
    use dinebot_db::repositories::{
        InMemoryRecommendationStore, InMemoryWorkQueue, RecommendationStore,
    };

    use super::{
        default_dispatcher, IntentContext, IntentDispatcher, IntentError, GREETING_REPLY,
        NO_RECORD_REPLY, THANK_YOU_REPLY,
    };
    use crate::payload::{CodeHookEvent, CurrentIntent};

    fn event(intent: &str, user_id: Option<&str>) -> CodeHookEvent {
        CodeHookEvent {
            user_id: user_id.map(str::to_owned),
            invocation_source: InvocationSource::FulfillmentCodeHook,
            current_intent: CurrentIntent { name: intent.to_owned(), slots: SlotSet::new() },
            session_attributes: None,
            bot: None,
        }
    }

    fn dispatcher(recommendations: Arc<InMemoryRecommendationStore>) -> IntentDispatcher {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 18).expect("date"));
        default_dispatcher(Arc::new(InMemoryWorkQueue::default()), recommendations, clock)
    }

    fn close_text(action: &DialogAction) -> &str {
        match action {
            DialogAction::Close { fulfillment_state, message } => {
                assert_eq!(*fulfillment_state, FulfillmentState::Fulfilled);
                &message.content
            }
            other => panic!("expected close, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn registers_the_four_supported_intents() {
        let dispatcher = dispatcher(Arc::default());
        assert_eq!(dispatcher.handler_count(), 4);
        assert_eq!(
            dispatcher.intent_names(),
            vec!["DiningSuggestionsIntent", "GreetingIntent", "RemindMeIntent", "ThankYouIntent"]
        );
    }

    #[tokio::test]
    async fn greeting_and_thanks_close_with_fixed_text() {
        let dispatcher = dispatcher(Arc::default());
        let ctx = IntentContext::default();

        let greeting =
            dispatcher.dispatch(&event("GreetingIntent", None), &ctx).await.expect("greeting");
        assert_eq!(close_text(&greeting.dialog_action), GREETING_REPLY);
        assert_eq!(greeting.session_attributes, None);

        let thanks =
            dispatcher.dispatch(&event("ThankYouIntent", None), &ctx).await.expect("thanks");
        assert_eq!(close_text(&thanks.dialog_action), THANK_YOU_REPLY);
    }

    #[tokio::test]
    async fn remind_me_reads_the_last_recommendation() {
        let store = Arc::new(InMemoryRecommendationStore::default());
        store.record("user-1", "Nom Wah, 13 Doyers St").await.expect("record");
        let dispatcher = dispatcher(store);
        let ctx = IntentContext::default();

        let found = dispatcher
            .dispatch(&event("RemindMeIntent", Some("user-1")), &ctx)
            .await
            .expect("remind me");
        assert_eq!(
            close_text(&found.dialog_action),
            "Your last recommendation is Nom Wah, 13 Doyers St"
        );

        let unknown = dispatcher
            .dispatch(&event("RemindMeIntent", Some("user-2")), &ctx)
            .await
            .expect("remind me unknown");
        assert_eq!(close_text(&unknown.dialog_action), NO_RECORD_REPLY);

        let anonymous =
            dispatcher.dispatch(&event("RemindMeIntent", None), &ctx).await.expect("anonymous");
        assert_eq!(close_text(&anonymous.dialog_action), NO_RECORD_REPLY);
    }

    #[tokio::test]
    async fn unknown_intent_is_a_fatal_error() {
        let dispatcher = dispatcher(Arc::default());
        let error = dispatcher
            .dispatch(&event("OrderFlowers", None), &IntentContext::default())
            .await
            .expect_err("unsupported");

        assert!(matches!(
            error,
            IntentError::Domain(DomainError::UnsupportedIntent(ref name)) if name == "OrderFlowers"
        ));
        let interface = ApplicationError::from(error).into_interface("corr-1");
        assert!(matches!(interface, InterfaceError::Internal { .. }));
    }
}
