//! Equality filters and result ordering for selects and subscriptions.

use std::cmp::Ordering;

use serde_json::Value;

use crate::row::Fields;

/// Sort direction for an ordered select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A conjunctive equality filter with an optional ordering.
///
/// Mirrors the query surface the hosted platform exposes to clients:
/// chained `.eq(column, value)` constraints and a single `.order(...)`.
/// Anything richer belongs server-side, not here.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
    order: Option<(String, SortOrder)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column == value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// Order results by a column.
    pub fn order(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order = Some((column.into(), order));
        self
    }

    /// True if a row's fields satisfy every condition.
    pub fn matches(&self, fields: &Fields) -> bool {
        self.conditions
            .iter()
            .all(|(col, want)| fields.get(col).unwrap_or(&Value::Null) == want)
    }

    /// Sort rows in place according to the configured ordering, if any.
    ///
    /// Nulls and missing columns sort last in either direction, matching
    /// the platform's `NULLS LAST` default.
    pub fn sort_fields(&self, rows: &mut [(uuid::Uuid, Fields)]) {
        let Some((column, order)) = &self.order else {
            return;
        };
        rows.sort_by(|(_, a), (_, b)| {
            let va = a.get(column.as_str());
            let vb = b.get(column.as_str());
            match (non_null(va), non_null(vb)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => {
                    let cmp = compare_values(a, b);
                    match order {
                        SortOrder::Ascending => cmp,
                        SortOrder::Descending => cmp.reverse(),
                    }
                }
            }
        });
    }
}

fn non_null(v: Option<&Value>) -> Option<&Value> {
    match v {
        Some(Value::Null) | None => None,
        Some(v) => Some(v),
    }
}

/// Total-enough ordering over the JSON values we store: numbers compare
/// numerically, strings lexically (ISO-8601 timestamps sort correctly),
/// everything else by serialized form.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().matches(&fields(&[("status", json!("active"))])));
    }

    #[test]
    fn conditions_are_conjunctive() {
        let filter = Filter::new().eq("status", "active").eq("type", "excess");
        assert!(filter.matches(&fields(&[
            ("status", json!("active")),
            ("type", json!("excess")),
        ])));
        assert!(!filter.matches(&fields(&[
            ("status", json!("active")),
            ("type", json!("need")),
        ])));
        assert!(!filter.matches(&fields(&[("status", json!("active"))])));
    }

    #[test]
    fn sort_orders_timestamps_descending() {
        let mut rows = vec![
            (
                Uuid::new_v4(),
                fields(&[("created_at", json!("2026-01-02T10:00:00Z"))]),
            ),
            (
                Uuid::new_v4(),
                fields(&[("created_at", json!("2026-01-03T10:00:00Z"))]),
            ),
            (Uuid::new_v4(), fields(&[("created_at", Value::Null)])),
        ];
        Filter::new()
            .order("created_at", SortOrder::Descending)
            .sort_fields(&mut rows);

        assert_eq!(rows[0].1["created_at"], json!("2026-01-03T10:00:00Z"));
        assert_eq!(rows[1].1["created_at"], json!("2026-01-02T10:00:00Z"));
        // Nulls last regardless of direction.
        assert_eq!(rows[2].1["created_at"], Value::Null);
    }

    #[test]
    fn sort_orders_numbers_ascending() {
        let mut rows = vec![
            (Uuid::new_v4(), fields(&[("qty", json!(30))])),
            (Uuid::new_v4(), fields(&[("qty", json!(4))])),
        ];
        Filter::new()
            .order("qty", SortOrder::Ascending)
            .sort_fields(&mut rows);
        assert_eq!(rows[0].1["qty"], json!(4));
    }
}
