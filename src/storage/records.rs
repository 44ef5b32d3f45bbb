/// Reading stored habit records and upgrading old ones
///
/// Two shapes of record exist in the wild:
///
/// * **Legacy**: written before habits could be completed. These have no
///   `isCompleted` field, may lack a `target`, and may use the status `new`.
/// * **Current**: carry `isCompleted`.
///
/// The presence of `isCompleted` is the version marker. A legacy record is
/// upgraded by deriving `isCompleted` from `status`, defaulting a missing or
/// falsy `target` to 21 and renaming status `new` to `active`. Every other
/// field passes through. Current records are not touched by the upgrade, so
/// running it twice changes nothing.
///
/// After the upgrade each record is parsed and its invariants repaired (see
/// [`Habit::enforce_invariants`]).

use serde_json::{Map, Value};

use crate::domain::{Habit, HabitId, DEFAULT_TARGET};
use crate::storage::StorageError;

/// Field whose presence marks a current-schema record
const VERSION_MARKER: &str = "isCompleted";

/// Schema generation of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    Legacy,
    Current,
}

impl SchemaVersion {
    /// Tell the generation of a raw record from its fields
    pub fn detect(raw: &Value) -> Self {
        match raw {
            Value::Object(fields) if fields.contains_key(VERSION_MARKER) => SchemaVersion::Current,
            _ => SchemaVersion::Legacy,
        }
    }
}

/// Upgrade a raw record to the current schema
///
/// Non-object values are returned as they are; they fail later, when parsed.
pub fn migrate_record(raw: Value) -> Value {
    if SchemaVersion::detect(&raw) == SchemaVersion::Current {
        return raw;
    }

    match raw {
        Value::Object(fields) => Value::Object(upgrade_legacy(fields)),
        other => other,
    }
}

fn upgrade_legacy(mut fields: Map<String, Value>) -> Map<String, Value> {
    let is_completed = fields.get("status").and_then(Value::as_str) == Some("completed");
    fields.insert(VERSION_MARKER.to_string(), Value::Bool(is_completed));

    if !fields.get("target").map(is_truthy).unwrap_or(false) {
        fields.insert("target".to_string(), Value::from(DEFAULT_TARGET));
    }

    if fields.get("status").and_then(Value::as_str) == Some("new") {
        fields.insert("status".to_string(), Value::from("active"));
    }

    fields
}

/// Loose truthiness, matching how older data treated an "empty" target
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Turn one raw stored record into a valid [`Habit`]
pub fn normalize(raw: Value) -> Result<Habit, serde_json::Error> {
    let mut habit: Habit = serde_json::from_value(migrate_record(raw))?;
    habit.enforce_invariants();
    Ok(habit)
}

/// A stored record that could not be turned into a [`Habit`]
///
/// `raw` is the record exactly as stored, so it can be written back
/// untouched.
#[derive(Debug)]
pub struct DroppedRecord {
    pub index: usize,
    pub raw: Value,
    pub error: StorageError,
}

/// A stored collection after migration
#[derive(Debug, Default)]
pub struct LoadedCollection {
    pub habits: Vec<Habit>,
    /// Records that were in the legacy shape
    pub upgraded: usize,
    /// Records that could not be read and were left out of `habits`
    pub dropped: Vec<DroppedRecord>,
}

impl LoadedCollection {
    /// Whether any stored record, readable or not, carries `id`
    pub fn contains_id(&self, id: &HabitId) -> bool {
        self.habits.iter().any(|h| &h.id == id)
            || self
                .dropped
                .iter()
                .any(|d| d.raw.get("id").and_then(Value::as_str) == Some(id.as_str()))
    }
}

/// Parse a stored payload and normalize every record in it
///
/// The payload must be a JSON array; anything else is an error. A single
/// unreadable record is reported in [`LoadedCollection::dropped`] rather
/// than failing the whole collection.
pub fn parse_collection(payload: &str) -> Result<LoadedCollection, StorageError> {
    let raw: Value = serde_json::from_str(payload)?;
    let records = match raw {
        Value::Array(records) => records,
        other => {
            return Err(StorageError::Migration(format!(
                "expected an array of habits, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut loaded = LoadedCollection::default();
    for (index, record) in records.into_iter().enumerate() {
        let version = SchemaVersion::detect(&record);

        match normalize(record.clone()) {
            Ok(habit) => {
                if version == SchemaVersion::Legacy {
                    loaded.upgraded += 1;
                }
                loaded.habits.push(habit);
            }
            Err(e) => loaded.dropped.push(DroppedRecord {
                index,
                raw: record,
                error: StorageError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                },
            }),
        }
    }

    Ok(loaded)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
