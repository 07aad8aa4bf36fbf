use serde_json::Value;

/// Keys every lead payload carries at the top level.
pub const LEAD_KEYS: &[&str] = &["user", "event", "showroom"];
/// Keys required inside the `user` sub-object of an HTTP request.
pub const USER_KEYS: &[&str] = &["email"];
/// Keys required inside the `showroom` sub-object.
pub const SHOWROOM_KEYS: &[&str] = &["id"];
/// Keys required inside the `event` sub-object.
pub const EVENT_KEYS: &[&str] = &["date", "type", "location"];
/// Keys required inside the `event.location` sub-object.
pub const LOCATION_KEYS: &[&str] = &["lat", "long", "admin_level_1", "admin_level_2", "country"];

/// Invalid-argument failures raised while shaping a lead payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required key `{key}` (expected {required:?})")]
    MissingKey {
        key: &'static str,
        required: &'static [&'static str],
    },
    #[error("{0}")]
    InvalidArgument(String),
}

impl ValidationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Check that `value` is an object holding every key in `required`.
///
/// Presence is all that is checked: a key mapped to `null` satisfies the requirement. Anything
/// other than an object is treated as an empty mapping, so the first required key is reported.
pub fn require_keys(
    value: &Value,
    required: &'static [&'static str],
) -> Result<(), ValidationError> {
    let map = value.as_object();
    match required
        .iter()
        .find(|key| !map.is_some_and(|entries| entries.contains_key(**key)))
    {
        Some(key) => Err(ValidationError::MissingKey {
            key: *key,
            required,
        }),
        None => Ok(()),
    }
}

/// Loose emptiness check used for scalar payload fields such as `event.date`.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
