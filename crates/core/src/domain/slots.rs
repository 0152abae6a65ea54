use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotName {
    Location,
    Cuisine,
    Date,
    DiningTime,
    NumberOfPeople,
    PhoneNumber,
    Email,
}

impl SlotName {
    /// Fixed order used for work-item packaging and missing-slot reporting.
    pub const ALL: [SlotName; 7] = [
        SlotName::Location,
        SlotName::Cuisine,
        SlotName::Date,
        SlotName::DiningTime,
        SlotName::NumberOfPeople,
        SlotName::PhoneNumber,
        SlotName::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Cuisine => "Cuisine",
            Self::Date => "Date",
            Self::DiningTime => "DiningTime",
            Self::NumberOfPeople => "NumberOfPeople",
            Self::PhoneNumber => "PhoneNumber",
            Self::Email => "Email",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == raw)
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot values as the dialog engine sends them: every known slot maps to a
/// value or `null`. Keys the engine sends that this bot does not model are
/// carried through untouched so a delegated slot set round-trips unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotSet(BTreeMap<String, Option<String>>);

impl SlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SlotName) -> Option<&str> {
        self.0.get(slot.as_str()).and_then(|value| value.as_deref())
    }

    pub fn set(&mut self, slot: SlotName, value: impl Into<String>) {
        self.0.insert(slot.as_str().to_owned(), Some(value.into()));
    }

    pub fn with(mut self, slot: SlotName, value: impl Into<String>) -> Self {
        self.set(slot, value);
        self
    }

    /// Marks the slot as unfilled; the key stays present with a `null` value.
    pub fn clear(&mut self, slot: SlotName) {
        self.0.insert(slot.as_str().to_owned(), None);
    }

    pub fn missing(&self) -> Vec<SlotName> {
        SlotName::ALL.into_iter().filter(|slot| self.get(*slot).is_none()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
