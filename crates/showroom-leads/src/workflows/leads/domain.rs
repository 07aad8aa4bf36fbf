use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user::PersonalInformation;

/// Identifier assigned by the lead repository once a lead is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Identifier wrapper for showrooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShowroomId(pub String);

impl fmt::Display for ShowroomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Venue a lead is addressed to. Read-only from the intake workflow's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showroom {
    pub id: ShowroomId,
    pub name: String,
    pub provider: String,
}

/// Kinds of events a lead can be about, keyed by their integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum EventType {
    Wedding = 1,
    Communion = 2,
    Baptism = 3,
    Celebration = 4,
    Corporate = 5,
}

impl EventType {
    pub const fn code(self) -> i64 {
        self as i64
    }

    pub const fn label(self) -> &'static str {
        match self {
            EventType::Wedding => "wedding",
            EventType::Communion => "communion",
            EventType::Baptism => "baptism",
            EventType::Celebration => "celebration",
            EventType::Corporate => "corporate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type {0}")]
pub struct UnknownEventType(pub i64);

impl TryFrom<i64> for EventType {
    type Error = UnknownEventType;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EventType::Wedding),
            2 => Ok(EventType::Communion),
            3 => Ok(EventType::Baptism),
            4 => Ok(EventType::Celebration),
            5 => Ok(EventType::Corporate),
            other => Err(UnknownEventType(other)),
        }
    }
}

impl From<EventType> for i64 {
    fn from(value: EventType) -> Self {
        value.code()
    }
}

/// Where an event takes place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    lat: f64,
    long: f64,
    admin_level_1: String,
    admin_level_2: String,
    country: String,
}

impl Location {
    pub fn new(
        lat: f64,
        long: f64,
        admin_level_1: impl Into<String>,
        admin_level_2: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            lat,
            long,
            admin_level_1: admin_level_1.into(),
            admin_level_2: admin_level_2.into(),
            country: country.into(),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn long(&self) -> f64 {
        self.long
    }

    pub fn admin_level_1(&self) -> &str {
        &self.admin_level_1
    }

    pub fn admin_level_2(&self) -> &str {
        &self.admin_level_2
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

/// The occasion a lead is about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    event_type: EventType,
    location: Location,
    date: DateTime<Utc>,
}

impl Event {
    pub fn new(event_type: EventType, location: Location, date: DateTime<Utc>) -> Self {
        Self {
            event_type,
            location,
            date,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Free-form metadata attached to a lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadInformationBag(BTreeMap<String, Value>);

impl LeadInformationBag {
    pub fn new(entries: BTreeMap<String, Value>) -> Self {
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for LeadInformationBag {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Attributes that decide whether two leads describe the same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadFingerprint {
    pub user_email: String,
    pub showroom_id: ShowroomId,
    pub event_type: EventType,
    pub event_date: DateTime<Utc>,
}

/// A user's recorded interest in an event at a showroom.
///
/// Leads are only built through [`User::do_lead`](super::user::User::do_lead); repositories
/// stamp the identifier on save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<LeadId>,
    user_email: String,
    personal_information: PersonalInformation,
    showroom: Showroom,
    event: Event,
    information: LeadInformationBag,
    created_at: DateTime<Utc>,
}

impl Lead {
    pub(crate) fn new(
        user_email: String,
        personal_information: PersonalInformation,
        showroom: Showroom,
        event: Event,
        information: LeadInformationBag,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            user_email,
            personal_information,
            showroom,
            event,
            information,
            created_at,
        }
    }

    /// Returns the lead stamped with a repository identifier.
    pub fn with_id(mut self, id: LeadId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<&LeadId> {
        self.id.as_ref()
    }

    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    pub fn personal_information(&self) -> &PersonalInformation {
        &self.personal_information
    }

    pub fn showroom(&self) -> &Showroom {
        &self.showroom
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn information(&self) -> &LeadInformationBag {
        &self.information
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn fingerprint(&self) -> LeadFingerprint {
        LeadFingerprint {
            user_email: self.user_email.to_ascii_lowercase(),
            showroom_id: self.showroom.id.clone(),
            event_type: self.event.event_type,
            event_date: self.event.date,
        }
    }

    pub fn view(&self) -> LeadView {
        LeadView {
            lead_id: self.id.clone(),
            showroom_id: self.showroom.id.clone(),
            showroom_name: self.showroom.name.clone(),
            event_type: self.event.event_type.label(),
            event_date: self.event.date,
            admin_level_1: self.event.location.admin_level_1.clone(),
            admin_level_2: self.event.location.admin_level_2.clone(),
            country: self.event.location.country.clone(),
            information: self.information.clone(),
        }
    }
}

/// Public representation of a lead; contact details stay out of API responses.
#[derive(Debug, Clone, Serialize)]
pub struct LeadView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
    pub showroom_id: ShowroomId,
    pub showroom_name: String,
    pub event_type: &'static str,
    pub event_date: DateTime<Utc>,
    pub admin_level_1: String,
    pub admin_level_2: String,
    pub country: String,
    pub information: LeadInformationBag,
}
