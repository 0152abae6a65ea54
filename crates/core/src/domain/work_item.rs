use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::slots::{SlotName, SlotSet};
use crate::errors::DomainError;

/// Queue bodies are unused; all data travels in attributes.
pub const WORK_ITEM_BODY: &str = "Other messages";
pub const USER_ID_ATTRIBUTE: &str = "UserId";
const STRING_DATA_TYPE: &str = "String";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptHandle(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageAttribute {
    pub data_type: String,
    pub string_value: String,
}

impl MessageAttribute {
    pub fn string(value: impl Into<String>) -> Self {
        Self { data_type: STRING_DATA_TYPE.to_owned(), string_value: value.into() }
    }
}

pub type MessageAttributes = BTreeMap<String, MessageAttribute>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub location: String,
    pub cuisine: String,
    pub date: String,
    pub dining_time: String,
    pub number_of_people: String,
    pub phone_number: String,
    pub email: String,
    pub user_id: Option<String>,
}

impl WorkItem {
    pub fn from_slots(slots: &SlotSet, user_id: Option<&str>) -> Result<Self, DomainError> {
        let required = |slot: SlotName| {
            slots.get(slot).map(str::to_owned).ok_or(DomainError::MissingSlot(slot))
        };

        Ok(Self {
            location: required(SlotName::Location)?,
            cuisine: required(SlotName::Cuisine)?,
            date: required(SlotName::Date)?,
            dining_time: required(SlotName::DiningTime)?,
            number_of_people: required(SlotName::NumberOfPeople)?,
            phone_number: required(SlotName::PhoneNumber)?,
            email: required(SlotName::Email)?,
            user_id: user_id.filter(|value| !value.trim().is_empty()).map(str::to_owned),
        })
    }

    pub fn slot_value(&self, slot: SlotName) -> &str {
        match slot {
            SlotName::Location => &self.location,
            SlotName::Cuisine => &self.cuisine,
            SlotName::Date => &self.date,
            SlotName::DiningTime => &self.dining_time,
            SlotName::NumberOfPeople => &self.number_of_people,
            SlotName::PhoneNumber => &self.phone_number,
            SlotName::Email => &self.email,
        }
    }

    pub fn to_attributes(&self) -> MessageAttributes {
        let mut attributes = SlotName::ALL
            .into_iter()
            .map(|slot| (slot.as_str().to_owned(), MessageAttribute::string(self.slot_value(slot))))
            .collect::<MessageAttributes>();
        if let Some(user_id) = &self.user_id {
            attributes.insert(USER_ID_ATTRIBUTE.to_owned(), MessageAttribute::string(user_id));
        }
        attributes
    }

    pub fn from_attributes(attributes: &MessageAttributes) -> Result<Self, DomainError> {
        let required = |slot: SlotName| {
            attributes
                .get(slot.as_str())
                .map(|attribute| attribute.string_value.clone())
                .ok_or(DomainError::MissingSlot(slot))
        };

        Ok(Self {
            location: required(SlotName::Location)?,
            cuisine: required(SlotName::Cuisine)?,
            date: required(SlotName::Date)?,
            dining_time: required(SlotName::DiningTime)?,
            number_of_people: required(SlotName::NumberOfPeople)?,
            phone_number: required(SlotName::PhoneNumber)?,
            email: required(SlotName::Email)?,
            user_id: attributes
                .get(USER_ID_ATTRIBUTE)
                .map(|attribute| attribute.string_value.clone()),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: MessageId,
    pub receipt_handle: ReceiptHandle,
    pub body: String,
    pub attributes: MessageAttributes,
    pub receive_count: u32,
}

impl ReceivedMessage {
    pub fn work_item(&self) -> Result<WorkItem, DomainError> {
        WorkItem::from_attributes(&self.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageAttribute, WorkItem, USER_ID_ATTRIBUTE};
    use crate::domain::slots::{SlotName, SlotSet};
    use crate::errors::DomainError;

    fn full_slots() -> SlotSet {
        SlotSet::new()
            .with(SlotName::Location, "Manhattan")
            .with(SlotName::Cuisine, "Thai")
            .with(SlotName::Date, "2030-05-01")
            .with(SlotName::DiningTime, "19:00")
            .with(SlotName::NumberOfPeople, "4")
            .with(SlotName::PhoneNumber, "2125550100")
            .with(SlotName::Email, "diner@example.com")
    }

    #[test]
    fn every_slot_becomes_a_string_attribute() {
        let item = WorkItem::from_slots(&full_slots(), Some("user-1")).expect("complete slots");
        let attributes = item.to_attributes();

        assert_eq!(attributes.len(), 8);
        assert_eq!(attributes["Cuisine"], MessageAttribute::string("Thai"));
        assert_eq!(attributes["NumberOfPeople"].data_type, "String");
        assert_eq!(attributes[USER_ID_ATTRIBUTE].string_value, "user-1");
        assert_eq!(WorkItem::from_attributes(&attributes).expect("decode"), item);
    }

    #[test]
    fn missing_slot_blocks_work_item_creation() {
        let mut slots = full_slots();
        slots.clear(SlotName::PhoneNumber);

        let error = WorkItem::from_slots(&slots, None).expect_err("phone is missing");
        assert_eq!(error, DomainError::MissingSlot(SlotName::PhoneNumber));
    }

    #[test]
    fn blank_user_id_is_not_forwarded() {
        let item = WorkItem::from_slots(&full_slots(), Some("  ")).expect("complete slots");
        assert_eq!(item.user_id, None);
        assert!(!item.to_attributes().contains_key(USER_ID_ATTRIBUTE));
    }

    #[test]
    fn attribute_wire_names_match_queue_format() {
        let value = serde_json::to_value(MessageAttribute::string("x")).expect("serialize");
        assert_eq!(value["DataType"], "String");
        assert_eq!(value["StringValue"], "x");
    }
}
