use thiserror::Error;

use crate::domain::slots::SlotName;
use crate::flows::states::{
    ConversationEvent, ConversationPhase, FlowAction, FlowContext, FlowType, TransitionOutcome,
};

pub trait FlowDefinition {
    fn flow_type(&self) -> FlowType;
    fn transition(
        &self,
        current: ConversationPhase,
        event: ConversationEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

/// Slot collection with validation, then a single enqueue on fulfillment.
#[derive(Clone, Debug, Default)]
pub struct DiningSuggestionFlow;

impl FlowDefinition for DiningSuggestionFlow {
    fn flow_type(&self) -> FlowType {
        FlowType::DiningSuggestion
    }

    fn transition(
        &self,
        current: ConversationPhase,
        event: ConversationEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_dining_suggestion(current, event, context)
    }
}

/// Intents answered with one canned or looked-up message.
#[derive(Clone, Debug, Default)]
pub struct StaticReplyFlow;

impl FlowDefinition for StaticReplyFlow {
    fn flow_type(&self) -> FlowType {
        FlowType::StaticReply
    }

    fn transition(
        &self,
        current: ConversationPhase,
        event: ConversationEvent,
        _context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        match (current, event) {
            (ConversationPhase::Collecting, ConversationEvent::ReplyReady)
            | (ConversationPhase::Delegated, ConversationEvent::ReplyReady) => {
                Ok(TransitionOutcome {
                    from: current,
                    to: ConversationPhase::Closed,
                    event,
                    actions: vec![FlowAction::Close],
                })
            }
            _ => Err(FlowTransitionError::InvalidTransition { phase: current, event }),
        }
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow.flow_type()
    }

    pub fn apply(
        &self,
        current: ConversationPhase,
        event: ConversationEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event, context)
    }

    /// Applies events in order, failing on the first rejected transition.
    pub fn replay(
        &self,
        start: ConversationPhase,
        events: &[ConversationEvent],
        context: &FlowContext,
    ) -> Result<Vec<TransitionOutcome>, FlowTransitionError> {
        let mut phase = start;
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            let outcome = self.apply(phase, *event, context)?;
            phase = outcome.to;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

impl Default for FlowEngine<DiningSuggestionFlow> {
    fn default() -> Self {
        Self::new(DiningSuggestionFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("missing required slots before fulfillment from {phase:?}: {missing_slots:?}")]
    MissingRequiredSlots { phase: ConversationPhase, missing_slots: Vec<SlotName> },
    #[error("invalid transition from {phase:?} using event {event:?}")]
    InvalidTransition { phase: ConversationPhase, event: ConversationEvent },
}

fn transition_dining_suggestion(
    current: ConversationPhase,
    event: ConversationEvent,
    context: &FlowContext,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use ConversationEvent::{
        FulfillmentRequested, SlotsReceived, ValidationFailed, ValidationPassed, WorkItemQueued,
    };
    use ConversationPhase::{Closed, Collecting, Delegated, Eliciting, Fulfilling, Validating};
    use FlowAction::{Close, Delegate, ElicitSlot, EnqueueWorkItem};

    let (to, actions) = match (current, event) {
        (Collecting, SlotsReceived) | (Eliciting, SlotsReceived) | (Delegated, SlotsReceived) => {
            (Validating, Vec::new())
        }
        (Validating, ValidationFailed) | (Delegated, ValidationFailed) => {
            (Eliciting, vec![ElicitSlot])
        }
        (Validating, ValidationPassed) => (Delegated, vec![Delegate]),
        (Delegated, FulfillmentRequested) => {
            if !context.missing_slots.is_empty() {
                return Err(FlowTransitionError::MissingRequiredSlots {
                    phase: current,
                    missing_slots: context.missing_slots.clone(),
                });
            }
            (Fulfilling, vec![EnqueueWorkItem])
        }
        (Fulfilling, WorkItemQueued) => (Closed, vec![Close]),
        _ => {
            return Err(FlowTransitionError::InvalidTransition { phase: current, event });
        }
    };

    Ok(TransitionOutcome { from: current, to, event, actions })
}

#[cfg(test)]
mod tests {
    use crate::domain::dialog::InvocationSource;
    use crate::domain::slots::SlotName;
    use crate::flows::engine::{
        DiningSuggestionFlow, FlowDefinition, FlowEngine, FlowTransitionError, StaticReplyFlow,
    };
    use crate::flows::states::{
        ConversationEvent, ConversationPhase, FlowAction, FlowContext, FlowType,
    };

    #[test]
    fn dialog_hook_with_valid_slots_delegates() {
        let engine = FlowEngine::default();
        let start = ConversationPhase::entry_for(InvocationSource::DialogCodeHook);

        let outcomes = engine
            .replay(
                start,
                &[ConversationEvent::SlotsReceived, ConversationEvent::ValidationPassed],
                &FlowContext::default(),
            )
            .expect("collecting -> validating -> delegated");

        assert_eq!(outcomes[1].to, ConversationPhase::Delegated);
        assert_eq!(outcomes[1].actions, vec![FlowAction::Delegate]);
    }

    #[test]
    fn elicit_loop_returns_to_validation() {
        let engine = FlowEngine::default();
        let context = FlowContext::default();

        let outcomes = engine
            .replay(
                ConversationPhase::Collecting,
                &[
                    ConversationEvent::SlotsReceived,
                    ConversationEvent::ValidationFailed,
                    ConversationEvent::SlotsReceived,
                    ConversationEvent::ValidationPassed,
                ],
                &context,
            )
            .expect("elicit loop");

        assert_eq!(outcomes[1].actions, vec![FlowAction::ElicitSlot]);
        assert_eq!(outcomes[2].to, ConversationPhase::Validating);
        assert_eq!(outcomes[3].to, ConversationPhase::Delegated);
    }

    #[test]
    fn fulfillment_enqueues_then_closes() {
        let engine = FlowEngine::default();
        let start = ConversationPhase::entry_for(InvocationSource::FulfillmentCodeHook);

        let outcomes = engine
            .replay(
                start,
                &[ConversationEvent::FulfillmentRequested, ConversationEvent::WorkItemQueued],
                &FlowContext::default(),
            )
            .expect("delegated -> fulfilling -> closed");

        assert_eq!(outcomes[0].actions, vec![FlowAction::EnqueueWorkItem]);
        assert_eq!(outcomes[1].to, ConversationPhase::Closed);
        assert_eq!(outcomes[1].actions, vec![FlowAction::Close]);
    }

    #[test]
    fn fulfillment_with_missing_slots_is_rejected() {
        let engine = FlowEngine::default();
        let error = engine
            .apply(
                ConversationPhase::Delegated,
                ConversationEvent::FulfillmentRequested,
                &FlowContext { missing_slots: vec![SlotName::Email] },
            )
            .expect_err("must not enqueue without every slot");

        assert!(matches!(error, FlowTransitionError::MissingRequiredSlots { .. }));
    }

    #[test]
    fn queueing_is_not_reachable_from_collection() {
        let engine = FlowEngine::default();
        let error = engine
            .apply(
                ConversationPhase::Collecting,
                ConversationEvent::WorkItemQueued,
                &FlowContext::default(),
            )
            .expect_err("collecting cannot skip fulfillment");

        assert_eq!(
            error,
            FlowTransitionError::InvalidTransition {
                phase: ConversationPhase::Collecting,
                event: ConversationEvent::WorkItemQueued,
            }
        );
    }

    #[test]
    fn closed_conversations_accept_nothing() {
        let engine = FlowEngine::default();
        let error = engine
            .apply(
                ConversationPhase::Closed,
                ConversationEvent::SlotsReceived,
                &FlowContext::default(),
            )
            .expect_err("closed is terminal");
        assert!(matches!(error, FlowTransitionError::InvalidTransition { .. }));
    }

    #[test]
    fn static_reply_closes_immediately() {
        let engine = FlowEngine::new(StaticReplyFlow);
        let outcome = engine
            .apply(
                ConversationPhase::Collecting,
                ConversationEvent::ReplyReady,
                &FlowContext::default(),
            )
            .expect("static reply closes");

        assert_eq!(outcome.to, ConversationPhase::Closed);
        assert_eq!(engine.flow_type(), FlowType::StaticReply);
        assert_eq!(DiningSuggestionFlow.flow_type(), FlowType::DiningSuggestion);
    }
}
