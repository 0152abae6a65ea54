use serde::{Deserialize, Serialize};

use crate::domain::dialog::InvocationSource;
use crate::domain::slots::SlotName;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowType {
    DiningSuggestion,
    StaticReply,
}

/// Where a conversation stands from this bot's point of view. The dialog
/// engine owns the conversation between turns; each code-hook invocation
/// re-enters at the phase implied by its invocation source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationPhase {
    Collecting,
    Validating,
    Eliciting,
    Delegated,
    Fulfilling,
    Closed,
}

impl ConversationPhase {
    pub fn entry_for(source: InvocationSource) -> Self {
        match source {
            InvocationSource::DialogCodeHook => Self::Collecting,
            InvocationSource::FulfillmentCodeHook => Self::Delegated,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationEvent {
    SlotsReceived,
    ValidationFailed,
    ValidationPassed,
    FulfillmentRequested,
    WorkItemQueued,
    ReplyReady,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlowContext {
    pub missing_slots: Vec<SlotName>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    ElicitSlot,
    Delegate,
    EnqueueWorkItem,
    Close,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: ConversationPhase,
    pub to: ConversationPhase,
    pub event: ConversationEvent,
    pub actions: Vec<FlowAction>,
}
