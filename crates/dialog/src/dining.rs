use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use dinebot_core::domain::dialog::{DialogResponse, FulfillmentState, InvocationSource, Message};
use dinebot_core::domain::slots::SlotName;
use dinebot_core::domain::work_item::WorkItem;
use dinebot_core::errors::DomainError;
use dinebot_core::flows::{
    ConversationEvent, ConversationPhase, DiningSuggestionFlow, FlowContext, FlowEngine,
    FlowTransitionError,
};
use dinebot_core::validation::{Clock, SlotValidator, SystemClock};
use dinebot_db::repositories::WorkQueue;

use crate::intents::{IntentContext, IntentError, IntentHandler, DINING_SUGGESTIONS_INTENT};
use crate::payload::CodeHookEvent;

/// Re-prompt used when validation flags a slot without saying why.
pub fn default_prompt(slot: SlotName) -> &'static str {
    match slot {
        SlotName::Location => "Which area of New York would you like to dine in?",
        SlotName::Cuisine => "What cuisine would you like to try?",
        SlotName::Date => "What date would you like to go?",
        SlotName::DiningTime => "What time would you like to go? Please answer as HH:MM.",
        SlotName::NumberOfPeople => "How many people are in your party?",
        SlotName::PhoneNumber => "What is your phone number?",
        SlotName::Email => "Which email address should I send the suggestion to?",
    }
}

pub fn confirmation_message(email: &str) -> String {
    format!("Okay! I will send the restaurant information to your email {email}")
}

pub struct DiningSuggestionHandler<C = SystemClock> {
    queue: Arc<dyn WorkQueue>,
    validator: SlotValidator<C>,
    flow: FlowEngine<DiningSuggestionFlow>,
}

impl<C> DiningSuggestionHandler<C>
where
    C: Clock,
{
    pub fn new(queue: Arc<dyn WorkQueue>, clock: C) -> Self {
        Self { queue, validator: SlotValidator::new(clock), flow: FlowEngine::default() }
    }

    fn collect(
        &self,
        event: &CodeHookEvent,
        ctx: &IntentContext,
    ) -> Result<DialogResponse, IntentError> {
        let context = FlowContext::default();
        let validating = self.flow.apply(
            ConversationPhase::Collecting,
            ConversationEvent::SlotsReceived,
            &context,
        )?;
        let result = self.validator.validate(event.slots());

        if let Some(slot) = result.violated_slot {
            self.flow.apply(validating.to, ConversationEvent::ValidationFailed, &context)?;
            return Ok(elicit(event, slot, result.message, ctx));
        }

        self.flow.apply(validating.to, ConversationEvent::ValidationPassed, &context)?;
        let session_attributes = event.session_attributes.clone().unwrap_or_default();
        Ok(DialogResponse::delegate(session_attributes, event.slots().clone()))
    }

    async fn fulfill(
        &self,
        event: &CodeHookEvent,
        ctx: &IntentContext,
    ) -> Result<DialogResponse, IntentError> {
        let result = self.validator.validate(event.slots());
        if let Some(slot) = result.violated_slot {
            self.flow.apply(
                ConversationPhase::Delegated,
                ConversationEvent::ValidationFailed,
                &FlowContext::default(),
            )?;
            return Ok(elicit(event, slot, result.message, ctx));
        }

        let context = FlowContext { missing_slots: event.slots().missing() };
        let fulfilling = match self.flow.apply(
            ConversationPhase::Delegated,
            ConversationEvent::FulfillmentRequested,
            &context,
        ) {
            Ok(outcome) => outcome,
            Err(FlowTransitionError::MissingRequiredSlots { missing_slots, .. }) => {
                let Some(first) = missing_slots.first().copied() else {
                    return Err(DomainError::InvalidPayload(
                        "fulfillment rejected without a missing slot".to_owned(),
                    )
                    .into());
                };
                return Ok(elicit(event, first, None, ctx));
            }
            Err(error) => return Err(DomainError::from(error).into()),
        };

        let item = WorkItem::from_slots(event.slots(), event.user_id())?;
        let message_id = self.queue.send(&item).await?;
        info!(
            event_name = "dialog.fulfillment.enqueued",
            correlation_id = %ctx.correlation_id,
            user_id = event.user_id().unwrap_or("anonymous"),
            message_id = %message_id.0,
            cuisine = %item.cuisine,
            "dining request queued for delivery"
        );

        self.flow.apply(fulfilling.to, ConversationEvent::WorkItemQueued, &context)?;
        Ok(DialogResponse::close(
            event.session_attributes.clone(),
            FulfillmentState::Fulfilled,
            confirmation_message(&item.email),
        ))
    }
}

fn elicit(
    event: &CodeHookEvent,
    slot: SlotName,
    message: Option<String>,
    ctx: &IntentContext,
) -> DialogResponse {
    debug!(
        event_name = "dialog.validation.failed",
        correlation_id = %ctx.correlation_id,
        intent = event.intent_name(),
        slot = slot.as_str(),
        "eliciting slot after failed validation"
    );

    let mut slots = event.slots().clone();
    slots.clear(slot);
    let prompt = message.unwrap_or_else(|| default_prompt(slot).to_owned());
    DialogResponse::elicit_slot(
        event.session_attributes.clone(),
        event.intent_name(),
        slots,
        slot,
        Some(Message::plain_text(prompt)),
    )
}

#[async_trait]
impl<C> IntentHandler for DiningSuggestionHandler<C>
where
    C: Clock + 'static,
{
    fn intent_name(&self) -> &'static str {
        DINING_SUGGESTIONS_INTENT
    }

    async fn handle(
        &self,
        event: &CodeHookEvent,
        ctx: &IntentContext,
    ) -> Result<DialogResponse, IntentError> {
        match event.invocation_source {
            InvocationSource::DialogCodeHook => self.collect(event, ctx),
            InvocationSource::FulfillmentCodeHook => self.fulfill(event, ctx).await,
        }
    }
}
