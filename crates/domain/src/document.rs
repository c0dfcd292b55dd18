//! Document: the single JSON value holding every mock resource.
//!
//! The top level is an object. Each key names a resource:
//! - an array value is a **collection** of records, each an object with an
//!   `id` field;
//! - an object value is a **singular** resource (e.g. a `profile`).
//!
//! Every mutating operation returns the stored value so the HTTP layer can
//! echo it back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConflictError, MockDbError, NotFoundError, ValidationError};
use crate::id::{ID_FIELD, RecordId, next_id};

/// The whole mock dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Wrap a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DocumentNotAnObject`] for any other value.
    pub fn from_value(value: Value) -> Result<Self, MockDbError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ValidationError::DocumentNotAnObject.into()),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Names of every top-level resource, in document order.
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Names of the resources that are collections.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, value)| value.is_array())
            .map(|(name, _)| name.as_str())
    }

    /// Read a whole resource.
    ///
    /// # Errors
    ///
    /// Returns [`MockDbError::NotFound`] when `name` is not a resource.
    pub fn read(&self, name: &str) -> Result<&Value, MockDbError> {
        self.0.get(name).ok_or_else(|| not_found(name, None))
    }

    /// Find one record of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`MockDbError::NotFound`] when the collection or the record
    /// is missing, or [`ValidationError::NotACollection`] when `name` is a
    /// singular resource.
    pub fn find(&self, name: &str, id: &RecordId) -> Result<&Value, MockDbError> {
        self.collection(name)?
            .iter()
            .find(|record| id.matches(record))
            .ok_or_else(|| not_found(name, Some(id)))
    }

    /// Insert into a collection, or replace a singular resource.
    ///
    /// Records without an `id` get one assigned (see [`next_id`]).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BodyNotAnObject`] when `body` is not an
    /// object, [`MockDbError::NotFound`] for an unknown resource, and
    /// [`MockDbError::Conflict`] when the supplied id is already taken.
    pub fn create(&mut self, name: &str, body: Value) -> Result<Value, MockDbError> {
        let body = object_body(body)?;
        match self.0.get_mut(name) {
            None => Err(not_found(name, None)),
            Some(Value::Array(records)) => {
                let record = match body.get(ID_FIELD).and_then(RecordId::from_field) {
                    Some(id) if records.iter().any(|r| id.matches(r)) => {
                        return Err(ConflictError {
                            resource: name.to_string(),
                            id: id.to_string(),
                        }
                        .into());
                    }
                    Some(_) => Value::Object(body),
                    // A missing or non-scalar id, such as `null`, gets a fresh one.
                    None => {
                        let mut record = Map::with_capacity(body.len() + 1);
                        record.insert(ID_FIELD.to_string(), next_id(records));
                        record.extend(body.into_iter().filter(|(key, _)| key != ID_FIELD));
                        Value::Object(record)
                    }
                };
                records.push(record.clone());
                Ok(record)
            }
            Some(slot) => {
                *slot = Value::Object(body);
                Ok(slot.clone())
            }
        }
    }

    /// Replace a record, keeping its identifier.
    ///
    /// # Errors
    ///
    /// Same as [`Document::find`], plus [`ValidationError::BodyNotAnObject`].
    pub fn replace(
        &mut self,
        name: &str,
        id: &RecordId,
        body: Value,
    ) -> Result<Value, MockDbError> {
        let body = object_body(body)?;
        let record = self.record_mut(name, id)?;
        let original_id = record.get(ID_FIELD).cloned().unwrap_or(Value::Null);
        let mut replacement = Map::with_capacity(body.len() + 1);
        replacement.insert(ID_FIELD.to_string(), original_id);
        replacement.extend(body.into_iter().filter(|(key, _)| key != ID_FIELD));
        *record = Value::Object(replacement);
        Ok(record.clone())
    }

    /// Shallow-merge `body` into a record. The identifier never changes.
    ///
    /// # Errors
    ///
    /// Same as [`Document::replace`].
    pub fn patch(&mut self, name: &str, id: &RecordId, body: Value) -> Result<Value, MockDbError> {
        let body = object_body(body)?;
        let record = self.record_mut(name, id)?;
        if let Value::Object(fields) = record {
            fields.extend(body.into_iter().filter(|(key, _)| key != ID_FIELD));
        }
        Ok(record.clone())
    }

    /// Remove a record and return it.
    ///
    /// # Errors
    ///
    /// Same as [`Document::find`].
    pub fn delete(&mut self, name: &str, id: &RecordId) -> Result<Value, MockDbError> {
        let records = self.collection_mut(name)?;
        let position = records
            .iter()
            .position(|record| id.matches(record))
            .ok_or_else(|| not_found(name, Some(id)))?;
        Ok(records.remove(position))
    }

    /// Replace a singular resource.
    ///
    /// # Errors
    ///
    /// Returns [`MockDbError::NotFound`] for an unknown resource,
    /// [`ValidationError::NotASingular`] for a collection, and
    /// [`ValidationError::BodyNotAnObject`] for a non-object body.
    pub fn replace_singular(&mut self, name: &str, body: Value) -> Result<Value, MockDbError> {
        let body = object_body(body)?;
        let fields = self.singular_mut(name)?;
        *fields = body;
        Ok(Value::Object(fields.clone()))
    }

    /// Shallow-merge `body` into a singular resource.
    ///
    /// # Errors
    ///
    /// Same as [`Document::replace_singular`].
    pub fn patch_singular(&mut self, name: &str, body: Value) -> Result<Value, MockDbError> {
        let body = object_body(body)?;
        let fields = self.singular_mut(name)?;
        fields.extend(body);
        Ok(Value::Object(fields.clone()))
    }

    fn collection(&self, name: &str) -> Result<&Vec<Value>, MockDbError> {
        match self.0.get(name) {
            None => Err(not_found(name, None)),
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(ValidationError::NotACollection(name.to_string()).into()),
        }
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Vec<Value>, MockDbError> {
        match self.0.get_mut(name) {
            None => Err(not_found(name, None)),
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(ValidationError::NotACollection(name.to_string()).into()),
        }
    }

    fn record_mut(&mut self, name: &str, id: &RecordId) -> Result<&mut Value, MockDbError> {
        self.collection_mut(name)?
            .iter_mut()
            .find(|record| id.matches(record))
            .ok_or_else(|| not_found(name, Some(id)))
    }

    fn singular_mut(&mut self, name: &str) -> Result<&mut Map<String, Value>, MockDbError> {
        match self.0.get_mut(name) {
            None => Err(not_found(name, None)),
            Some(Value::Object(fields)) => Ok(fields),
            Some(_) => Err(ValidationError::NotASingular(name.to_string()).into()),
        }
    }
}

impl TryFrom<Value> for Document {
    type Error = MockDbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn object_body(body: Value) -> Result<Map<String, Value>, MockDbError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::BodyNotAnObject.into()),
    }
}

fn not_found(name: &str, id: Option<&RecordId>) -> MockDbError {
    NotFoundError {
        resource: name.to_string(),
        id: id.map(ToString::to_string),
    }
    .into()
}
