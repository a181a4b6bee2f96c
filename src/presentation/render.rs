//! Plain-text rendering of rows for the terminal.

use serde_json::Value;

use crate::domain::entities::{PageCursor, Record};

/// Fields tried, in order, to describe a row in one line.
const SUMMARY_FIELDS: [&str; 9] = [
    "name",
    "title",
    "username",
    "full_name",
    "address",
    "phone",
    "email",
    "role",
    "status",
];

const SUMMARY_WIDTH: usize = 3;

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One-line description: the id followed by the first few known fields.
#[must_use]
pub fn summarize(record: &Record) -> String {
    let id = record
        .id()
        .map_or_else(|| "-".to_string(), |id| id.to_string());

    let parts: Vec<String> = SUMMARY_FIELDS
        .iter()
        .filter_map(|key| record.get(key).and_then(scalar).map(|v| format!("{key}={v}")))
        .take(SUMMARY_WIDTH)
        .collect();

    if parts.is_empty() {
        format!("#{id}")
    } else {
        format!("#{id}  {}", parts.join("  "))
    }
}

/// Footer under a list: how much is shown and whether more exists.
#[must_use]
pub fn footer(shown: usize, cursor: &PageCursor) -> String {
    let total = cursor.total.max(shown as u64);
    if cursor.has_next {
        format!("{shown} of {total} shown, more available")
    } else {
        format!("{shown} of {total} shown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_summary_picks_known_fields_in_order() {
        let row = record(json!({
            "id": 4, "status": "sold", "name": "Cottage 12", "price": 9_500_000, "address": ""
        }));

        assert_eq!(summarize(&row), "#4  name=Cottage 12  status=sold");
    }

    #[test]
    fn test_summary_without_fields() {
        assert_eq!(summarize(&record(json!({"price": 1}))), "#-");
    }

    #[test]
    fn test_footer() {
        let cursor = PageCursor {
            offset: 10,
            limit: 10,
            total: 25,
            has_next: true,
        };
        assert_eq!(footer(20, &cursor), "20 of 25 shown, more available");
        assert_eq!(footer(3, &PageCursor::fresh(10)), "3 of 3 shown");
    }
}
