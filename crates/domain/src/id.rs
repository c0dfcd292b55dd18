//! Record identifiers.
//!
//! Records are addressed by the string form of their `id` field, so a path
//! segment `1` matches both `{"id": 1}` and `{"id": "1"}`.

use std::fmt;

use serde_json::Value;

/// Name of the identifying field carried by every record.
pub const ID_FIELD: &str = "id";

/// Identifier taken from a request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw path segment.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Read the identifier of a record, if it has a scalar one.
    #[must_use]
    pub fn of(record: &Value) -> Option<Self> {
        record.get(ID_FIELD).and_then(Self::from_field)
    }

    /// Read an identifier from the value of an `id` field. `null`, objects
    /// and arrays are not identifiers.
    #[must_use]
    pub fn from_field(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Whether `record` carries this identifier.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        Self::of(record).is_some_and(|id| id == *self)
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pick the identifier for a new record appended to `records`.
///
/// An empty collection starts at `1`. When every existing id is an integer
/// the next one is `max + 1`; any other shape falls back to a random UUID.
#[must_use]
pub fn next_id(records: &[Value]) -> Value {
    let mut max: Option<i64> = None;
    for record in records {
        match record.get(ID_FIELD).and_then(Value::as_i64) {
            Some(id) => max = Some(max.map_or(id, |m| m.max(id))),
            None if record.get(ID_FIELD).is_some() => {
                return Value::String(uuid::Uuid::new_v4().to_string());
            }
            None => {}
        }
    }
    Value::from(max.map_or(1, |m| m.saturating_add(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_match_numeric_id_by_string_form() {
        let id = RecordId::new("1");
        assert!(id.matches(&json!({"id": 1})));
        assert!(id.matches(&json!({"id": "1"})));
        assert!(!id.matches(&json!({"id": 2})));
    }

    #[test]
    fn should_not_match_record_without_id() {
        let id = RecordId::new("1");
        assert!(!id.matches(&json!({"title": "x"})));
        assert!(RecordId::of(&json!({"id": null})).is_none());
    }

    #[test]
    fn should_start_at_one_when_collection_is_empty() {
        assert_eq!(next_id(&[]), json!(1));
    }

    #[test]
    fn should_increment_max_integer_id() {
        let records = vec![json!({"id": 3}), json!({"id": 9}), json!({"id": 4})];
        assert_eq!(next_id(&records), json!(10));
    }

    #[test]
    fn should_fall_back_to_uuid_when_ids_are_strings() {
        let records = vec![json!({"id": "abc"})];
        let id = next_id(&records);
        let text = id.as_str().unwrap();
        assert!(uuid::Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn should_ignore_records_without_id_when_computing_next() {
        let records = vec![json!({"title": "untitled"}), json!({"id": 2})];
        assert_eq!(next_id(&records), json!(3));
    }
}
