//! Coercion of loosely typed request payloads into lead domain values.
//!
//! Callers validate key presence with [`require_keys`] first; the functions here only deal
//! with the shape of individual values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::domain::{Event, EventType, LeadInformationBag, Location, ShowroomId};
use super::user::{PersonalInformation, User};
use super::validation::{require_keys, ValidationError, USER_KEYS};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Showroom ids are strings or numbers; any other value cannot name a showroom.
pub(crate) fn showroom_id(value: &Value) -> Option<ShowroomId> {
    scalar_text(value).map(ShowroomId)
}

/// Render a raw showroom id for incident messages; `null` renders empty.
pub(crate) fn display_id(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => scalar_text(other).unwrap_or_else(|| other.to_string()),
    }
}

/// Integer coercion for `event.type`; numeric strings are accepted.
pub(crate) fn event_type(value: &Value) -> Result<EventType, ValidationError> {
    let code = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    code.ok_or_else(|| ValidationError::invalid(format!("Event type {value} is not a number")))
        .and_then(|code| {
            EventType::try_from(code).map_err(|err| ValidationError::invalid(err.to_string()))
        })
}

/// Parse `event.date` as a UTC instant. Dates without a time component land on midnight.
pub(crate) fn event_date(value: &Value) -> Result<DateTime<Utc>, ValidationError> {
    let raw = value
        .as_str()
        .map(str::trim)
        .ok_or_else(|| ValidationError::invalid("Date must be a string"))?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    naive
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::invalid(format!("Date {raw:?} is not a valid date")))
}

pub(crate) fn location(value: &Value) -> Result<Location, ValidationError> {
    Ok(Location::new(
        coordinate(&value["lat"], "lat")?,
        coordinate(&value["long"], "long")?,
        label(&value["admin_level_1"], "admin_level_1")?,
        label(&value["admin_level_2"], "admin_level_2")?,
        label(&value["country"], "country")?,
    ))
}

pub(crate) fn event(value: &Value) -> Result<Event, ValidationError> {
    let event_type = event_type(&value["type"])?;
    let location = location(&value["location"])?;
    let date = event_date(&value["date"])?;
    Ok(Event::new(event_type, location, date))
}

/// Wrap the optional `info` object; absent or `null` means an empty bag.
pub(crate) fn information_bag(
    value: Option<&Value>,
) -> Result<LeadInformationBag, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(LeadInformationBag::default()),
        Some(Value::Object(map)) => Ok(map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()),
        Some(_) => Err(ValidationError::invalid("Lead info must be an object")),
    }
}

/// Build the acting [`User`] from the `user` sub-object of a request.
///
/// `email` is mandatory. Personal information is attached when any of `name`, `surnames`
/// (or `surname`) and `phone` is present, in which case all three must be non-empty.
pub fn user_from_payload(value: &Value) -> Result<User, ValidationError> {
    require_keys(value, USER_KEYS)?;
    let email = value["email"]
        .as_str()
        .ok_or_else(|| ValidationError::invalid("Email must be a string"))?;
    let user = User::new(email)?;

    let surnames = value.get("surnames").or_else(|| value.get("surname"));
    let name = value.get("name");
    let phone = value.get("phone");
    if name.is_none() && surnames.is_none() && phone.is_none() {
        return Ok(user);
    }

    let text = |field: Option<&Value>| field.and_then(scalar_text).unwrap_or_default();
    let information = PersonalInformation::new(text(name), text(surnames), text(phone))?;
    Ok(user.with_personal_information(information))
}

fn coordinate(value: &Value, field: &str) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|coordinate| coordinate.is_finite())
        .ok_or_else(|| ValidationError::invalid(format!("Location {field} must be numeric")))
}

fn label(value: &Value, field: &str) -> Result<String, ValidationError> {
    scalar_text(value)
        .ok_or_else(|| ValidationError::invalid(format!("Location {field} must be a string")))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
