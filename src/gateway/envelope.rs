// src/gateway/envelope.rs
//! The list endpoints answer in one of three envelopes; everything past the
//! gateway only ever sees `Page`.

use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};
use crate::pagination::Page;

fn take_items(map: &mut Map<String, Value>) -> Option<Page<Value>> {
    let items = match map.remove("items") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            map.insert("items".to_string(), other);
            return None;
        }
        None => return None,
    };
    let total_count = map
        .get("totalCount")
        .and_then(Value::as_u64)
        .unwrap_or(items.len() as u64);
    Some(Page::new(items, total_count))
}

fn describe(body: &Value) -> String {
    match body {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Array(items) => format!("bare array of {} items", items.len()),
        Value::Null => "empty body".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
    }
}

/// Tries, in order: `{ items, totalCount }`, `{ data: { items, totalCount } }`,
/// `{ data: [...] }` (count = array length).
pub fn normalize_page(body: Value) -> ClientResult<Page<Value>> {
    let description = describe(&body);

    if let Value::Object(mut map) = body {
        if let Some(page) = take_items(&mut map) {
            return Ok(page);
        }

        match map.remove("data") {
            Some(Value::Object(mut data)) => {
                if let Some(page) = take_items(&mut data) {
                    return Ok(page);
                }
            }
            Some(Value::Array(items)) => {
                let total_count = items.len() as u64;
                return Ok(Page::new(items, total_count));
            }
            _ => {}
        }
    }

    log::warn!("Unrecognized list envelope: {}", description);
    Err(ClientError::UnexpectedEnvelope(description))
}

/// Mutation and detail calls wrap the record in `data` most of the time.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Value {
        json!([{ "areaId": 1 }, { "areaId": 2 }])
    }

    #[test]
    fn test_flat_envelope() {
        let page = normalize_page(json!({ "items": items(), "totalCount": 5 })).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn test_nested_envelope() {
        let page = normalize_page(json!({
            "success": true,
            "data": { "items": items(), "totalCount": 5 }
        }))
        .unwrap();
        assert_eq!(page.items, items().as_array().cloned().unwrap());
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn test_bare_data_array_counts_items() {
        let page = normalize_page(json!({ "data": items() })).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_missing_total_falls_back_to_length() {
        let page = normalize_page(json!({ "items": items() })).unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_unknown_shapes_are_errors() {
        for body in [
            json!({ "records": items() }),
            json!({ "data": { "rows": [] } }),
            json!({ "items": "nope" }),
            items(),
            Value::Null,
        ] {
            match normalize_page(body) {
                Err(ClientError::UnexpectedEnvelope(_)) => {}
                other => panic!("expected envelope error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unwrap_data() {
        assert_eq!(unwrap_data(json!({ "data": { "areaId": 3 } })), json!({ "areaId": 3 }));
        assert_eq!(unwrap_data(json!({ "areaId": 3 })), json!({ "areaId": 3 }));
        assert_eq!(unwrap_data(json!(true)), json!(true));
    }
}
