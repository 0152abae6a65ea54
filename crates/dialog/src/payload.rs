use serde::{Deserialize, Serialize};

use dinebot_core::domain::dialog::{InvocationSource, SessionAttributes};
use dinebot_core::domain::slots::SlotSet;
use dinebot_core::errors::DomainError;

/// One code-hook invocation sent by the dialog engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeHookEvent {
    #[serde(default)]
    pub user_id: Option<String>,
    pub invocation_source: InvocationSource,
    pub current_intent: CurrentIntent,
    #[serde(default)]
    pub session_attributes: Option<SessionAttributes>,
    #[serde(default)]
    pub bot: Option<BotInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentIntent {
    pub name: String,
    #[serde(default)]
    pub slots: SlotSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotInfo {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl CodeHookEvent {
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw)
            .map_err(|error| DomainError::InvalidPayload(format!("code hook event: {error}")))
    }

    pub fn intent_name(&self) -> &str {
        &self.current_intent.name
    }

    pub fn slots(&self) -> &SlotSet {
        &self.current_intent.slots
    }

    /// Blank ids count as anonymous.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|value| !value.trim().is_empty())
    }

    pub fn bot_name(&self) -> Option<&str> {
        self.bot.as_ref().map(|bot| bot.name.as_str())
    }
}
