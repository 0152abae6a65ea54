use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::slots::{SlotName, SlotSet};

pub type SessionAttributes = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationSource {
    DialogCodeHook,
    FulfillmentCodeHook,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentState {
    Fulfilled,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    PlainText,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: ContentType,
    pub content: String,
}

impl Message {
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self { content_type: ContentType::PlainText, content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violated_slot: Option<SlotName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true, violated_slot: None, message: None }
    }

    pub fn invalid(slot: SlotName, message: Option<String>) -> Self {
        Self { is_valid: false, violated_slot: Some(slot), message }
    }
}

/// Next step handed back to the dialog engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DialogAction {
    #[serde(rename_all = "camelCase")]
    ElicitSlot {
        intent_name: String,
        slots: SlotSet,
        slot_to_elicit: SlotName,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<Message>,
    },
    #[serde(rename_all = "camelCase")]
    Delegate { slots: SlotSet },
    #[serde(rename_all = "camelCase")]
    Close { fulfillment_state: FulfillmentState, message: Message },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<SessionAttributes>,
    pub dialog_action: DialogAction,
}

impl DialogResponse {
    pub fn elicit_slot(
        session_attributes: Option<SessionAttributes>,
        intent_name: impl Into<String>,
        slots: SlotSet,
        slot_to_elicit: SlotName,
        message: Option<Message>,
    ) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction::ElicitSlot {
                intent_name: intent_name.into(),
                slots,
                slot_to_elicit,
                message,
            },
        }
    }

    pub fn delegate(session_attributes: SessionAttributes, slots: SlotSet) -> Self {
        Self {
            session_attributes: Some(session_attributes),
            dialog_action: DialogAction::Delegate { slots },
        }
    }

    pub fn close(
        session_attributes: Option<SessionAttributes>,
        fulfillment_state: FulfillmentState,
        content: impl Into<String>,
    ) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction::Close {
                fulfillment_state,
                message: Message::plain_text(content),
            },
        }
    }
}
