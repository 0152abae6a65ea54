pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod selection;
pub mod validation;

pub use domain::dialog::{
    DialogAction, DialogResponse, FulfillmentState, InvocationSource, Message, SessionAttributes,
    ValidationResult,
};
pub use domain::restaurant::{LastRecommendation, Restaurant, RestaurantId};
pub use domain::slots::{SlotName, SlotSet};
pub use domain::work_item::{
    MessageAttribute, MessageAttributes, MessageId, ReceiptHandle, ReceivedMessage, WorkItem,
};
pub use errors::{ApplicationError, ClientError, DomainError, InterfaceError};
pub use selection::{RandomSource, ThreadRandom};
pub use validation::{Clock, SlotValidator, SystemClock};
