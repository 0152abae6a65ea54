//! Slot validation for dining-suggestion requests.
//!
//! Checks run in a fixed order and stop at the first violation, so an invalid
//! cuisine hides every problem that comes after it. Absent slots are skipped;
//! collecting them is the dialog engine's job.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::domain::dialog::ValidationResult;
use crate::domain::slots::{SlotName, SlotSet};

pub const SUPPORTED_CUISINES: &[&str] = &[
    "indian",
    "italian",
    "korean",
    "chinese",
    "japanese",
    "mexican",
    "french",
    "thai",
    "vietnamese",
    "caribbean",
    "turkish",
];

pub const SERVICE_AREAS: &[&str] = &[
    "manhattan",
    "brooklyn",
    "queens",
    "sunset park",
    "edgewater",
    "bensonhurst",
    "jackson heights",
    "union city",
    "fairview",
    "crown heights",
    "staten island",
    "astoria",
    "sunnyside",
    "long island city",
];

pub const OPENING_HOUR: i64 = 10;
pub const LAST_SEATING_HOUR: i64 = 23;

pub const DATE_NOT_UNDERSTOOD: &str = "I did not understand that, what date would you like to go?";
pub const DATE_IN_PAST: &str = "You are not a time traveller. What day would you like to go?";
pub const OUTSIDE_BUSINESS_HOURS: &str =
    "Our business hours are from 10 am. to 10 pm. Can you specify a time during this range?";
pub const INVALID_PARTY_SIZE: &str =
    "Sorry, the number of guest is invalid. Please enter a valid number.";
pub const INVALID_PHONE: &str = "Sorry, the phone number is invalid. Please enter a valid number.";
pub const INVALID_EMAIL: &str = "Sorry, the email is invalid. Please enter a valid email.";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Source of "today" for past-date checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock read in the bot's service timezone, daylight saving included.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn today_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.today_at(Utc::now())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct SlotValidator<C = SystemClock> {
    clock: C,
}

impl<C> SlotValidator<C>
where
    C: Clock,
{
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn validate(&self, slots: &SlotSet) -> ValidationResult {
        let checks: [(SlotName, fn(&Self, &str) -> Option<Option<String>>); 7] = [
            (SlotName::Cuisine, Self::check_cuisine),
            (SlotName::Location, Self::check_location),
            (SlotName::Date, Self::check_date),
            (SlotName::DiningTime, Self::check_dining_time),
            (SlotName::NumberOfPeople, Self::check_party_size),
            (SlotName::PhoneNumber, Self::check_phone),
            (SlotName::Email, Self::check_email),
        ];

        for (slot, check) in checks {
            let Some(value) = slots.get(slot) else {
                continue;
            };
            if let Some(message) = check(self, value) {
                return ValidationResult::invalid(slot, message);
            }
        }

        ValidationResult::valid()
    }

    // Each check returns `None` when the value passes, otherwise the optional
    // re-prompt text.

    fn check_cuisine(&self, value: &str) -> Option<Option<String>> {
        (!SUPPORTED_CUISINES.contains(&value.to_lowercase().as_str())).then(|| {
            Some(format!("We do not have {value}, would you like a different cuisine?"))
        })
    }

    fn check_location(&self, value: &str) -> Option<Option<String>> {
        (!SERVICE_AREAS.contains(&value.to_lowercase().as_str()))
            .then(|| Some(format!("{value} is out of our service. Try naming an area in NYC!")))
    }

    fn check_date(&self, value: &str) -> Option<Option<String>> {
        match parse_date(value) {
            None => Some(Some(DATE_NOT_UNDERSTOOD.to_owned())),
            Some(date) if date < self.clock.today() => Some(Some(DATE_IN_PAST.to_owned())),
            Some(_) => None,
        }
    }

    fn check_dining_time(&self, value: &str) -> Option<Option<String>> {
        // Malformed times carry no message so the engine's own slot prompt is used.
        let Some((hour, _minute)) = parse_dining_time(value) else {
            return Some(None);
        };
        (!(OPENING_HOUR..=LAST_SEATING_HOUR).contains(&hour))
            .then(|| Some(OUTSIDE_BUSINESS_HOURS.to_owned()))
    }

    fn check_party_size(&self, value: &str) -> Option<Option<String>> {
        let valid = value.trim().parse::<i64>().map(|count| count >= 0).unwrap_or(false);
        (!valid).then(|| Some(INVALID_PARTY_SIZE.to_owned()))
    }

    fn check_phone(&self, value: &str) -> Option<Option<String>> {
        (value.chars().count() != 10).then(|| Some(INVALID_PHONE.to_owned()))
    }

    fn check_email(&self, value: &str) -> Option<Option<String>> {
        (!value.contains('@')).then(|| Some(INVALID_EMAIL.to_owned()))
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS.iter().find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// `HH:MM`, exactly five characters, both halves integers.
pub fn parse_dining_time(raw: &str) -> Option<(i64, i64)> {
    if raw.chars().count() != 5 {
        return None;
    }
    let (hour, minute) = raw.split_once(':')?;
    Some((hour.trim().parse().ok()?, minute.trim().parse().ok()?))
}
