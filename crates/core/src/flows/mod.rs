pub mod engine;
pub mod states;

pub use engine::{
    DiningSuggestionFlow, FlowDefinition, FlowEngine, FlowTransitionError, StaticReplyFlow,
};
pub use states::{
    ConversationEvent, ConversationPhase, FlowAction, FlowContext, FlowType, TransitionOutcome,
};
