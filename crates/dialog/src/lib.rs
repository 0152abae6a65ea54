//! Conversation surface of dinebot.
//!
//! - **Front door** (`front_door`) - chat request in, dialog engine reply out
//! - **Dialog engine** (`engine`) - client for the managed language-understanding runtime
//! - **Code hook** (`payload`, `intents`, `dining`) - slot validation and fulfillment
//!   called back by the engine
//!
//! ```text
//! Chat UI → FrontDoor → DialogEngine ──code hook──→ IntentDispatcher → WorkQueue
//! ```

pub mod dining;
pub mod engine;
pub mod front_door;
pub mod intents;
pub mod payload;

pub use dining::DiningSuggestionHandler;
pub use engine::{DialogEngine, EngineReply, HttpDialogEngine, NoopDialogEngine};
pub use front_door::{ChatReply, ChatRequest, FrontDoor};
pub use intents::{default_dispatcher, IntentContext, IntentDispatcher, IntentError, IntentHandler};
pub use payload::CodeHookEvent;
