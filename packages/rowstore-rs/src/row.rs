//! Rows, field maps, write guards, and change events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A row's columns, minus the primary key. JSON object keyed by column name.
pub type Fields = Map<String, Value>;

/// A stored row: primary key plus its columns.
///
/// The `id` column is managed by the store and never appears in `fields`;
/// [`Row::to_value`] reassembles the full object for deserialization into
/// domain models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: Uuid,
    pub fields: Fields,
}

impl Row {
    pub fn new(id: Uuid, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Reassemble the complete JSON object including the `id` column.
    pub fn to_value(&self) -> Value {
        let mut obj = self.fields.clone();
        obj.insert("id".to_string(), Value::String(self.id.to_string()));
        Value::Object(obj)
    }

    /// Read a single column, if present and non-null.
    pub fn get(&self, column: &str) -> Option<&Value> {
        match self.fields.get(column) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }
}

/// Precondition for an update.
///
/// `Expect` carries the prior values the caller read; the store applies the
/// write only if every listed column still holds its expected value. The
/// check and the write are atomic on the store side.
#[derive(Debug, Clone, Default)]
pub enum Guard {
    /// Unconditional write.
    #[default]
    None,
    /// Write only if the stored row still matches these prior values.
    Expect(Fields),
}

impl Guard {
    /// Guard on a single column's prior value.
    pub fn expect(column: impl Into<String>, prior: impl Into<Value>) -> Self {
        let mut fields = Fields::new();
        fields.insert(column.into(), prior.into());
        Guard::Expect(fields)
    }

    /// True if `stored` satisfies this guard.
    pub fn holds_for(&self, stored: &Fields) -> bool {
        match self {
            Guard::None => true,
            Guard::Expect(expected) => expected
                .iter()
                .all(|(col, want)| stored.get(col).unwrap_or(&Value::Null) == want),
        }
    }
}

/// A realtime change event. The feed carries inserts and updates only;
/// deletes are not delivered.
#[derive(Debug, Clone)]
pub enum Change {
    Inserted(Row),
    Updated(Row),
}

impl Change {
    /// The row the event is about, whichever kind it is.
    pub fn row(&self) -> &Row {
        match self {
            Change::Inserted(row) | Change::Updated(row) => row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn to_value_includes_id() {
        let id = Uuid::new_v4();
        let row = Row::new(id, fields(&[("name", json!("North Shelf"))]));
        let value = row.to_value();
        assert_eq!(value["id"], json!(id.to_string()));
        assert_eq!(value["name"], json!("North Shelf"));
    }

    #[test]
    fn get_treats_null_as_absent() {
        let row = Row::new(
            Uuid::new_v4(),
            fields(&[("notes", Value::Null), ("qty", json!(3))]),
        );
        assert!(row.get("notes").is_none());
        assert!(row.get("missing").is_none());
        assert_eq!(row.get("qty"), Some(&json!(3)));
    }

    #[test]
    fn guard_none_always_holds() {
        assert!(Guard::None.holds_for(&fields(&[("a", json!(1))])));
    }

    #[test]
    fn guard_expect_checks_prior_values() {
        let stored = fields(&[("quantity_claimed", json!(5)), ("status", json!("active"))]);

        assert!(Guard::expect("quantity_claimed", 5).holds_for(&stored));
        assert!(!Guard::expect("quantity_claimed", 4).holds_for(&stored));
        // A column absent from the row only matches an expected null.
        assert!(!Guard::expect("missing", 1).holds_for(&stored));
        assert!(Guard::expect("missing", Value::Null).holds_for(&stored));
    }
}
