//! Firestore REST typed-value codec
//!
//! The REST API wraps every field in a tagged object (`stringValue`,
//! `arrayValue`, `mapValue`, ...). Records are converted through plain
//! `serde_json::Value` so the session model keeps its ordinary serde derive.

use serde_json::{json, Map, Value};
use studynotes_common::StudySession;

use super::StoreError;

/// Encode a session as a Firestore `fields` map
pub fn encode_session(session: &StudySession) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(session).map_err(|e| StoreError::Malformed(e.to_string()))? {
        Value::Object(map) => Ok(encode_fields(&map)),
        other => Err(StoreError::Malformed(format!(
            "session serialized to non-object: {other}"
        ))),
    }
}

/// Decode a Firestore `fields` map into a session
pub fn decode_session(fields: &Map<String, Value>) -> Result<StudySession, StoreError> {
    let plain = decode_fields(fields)?;
    serde_json::from_value(Value::Object(plain)).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        // Firestore sends and expects 64-bit integers as strings
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let tagged = value
        .as_object()
        .and_then(|map| map.iter().next())
        .map(|(tag, inner)| (tag.as_str(), inner))
        .ok_or_else(|| StoreError::Malformed(format!("untagged value: {value}")))?;

    match tagged {
        ("nullValue", _) => Ok(Value::Null),
        ("booleanValue", b) => Ok(b.clone()),
        ("integerValue", Value::String(s)) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| StoreError::Malformed(format!("integerValue {s:?}: {e}"))),
        ("integerValue", n) | ("doubleValue", n) => Ok(n.clone()),
        ("stringValue", s)
        | ("timestampValue", s)
        | ("referenceValue", s)
        | ("bytesValue", s) => Ok(s.clone()),
        ("arrayValue", array) => array
            .get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
            .unwrap_or_else(|| Ok(Vec::new()))
            .map(Value::Array),
        ("mapValue", map) => map
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_else(|| Ok(Map::new()))
            .map(Value::Object),
        (tag, _) => Err(StoreError::Malformed(format!("unsupported value type {tag}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studynotes_common::Flashcard;

    fn sample() -> StudySession {
        StudySession {
            user_id: "u1".to_string(),
            notes: "Genesis 1 describes creation.".to_string(),
            summary: "A short summary.".to_string(),
            flashcards: vec![Flashcard::new("Q1", "A1")],
        }
    }

    #[test]
    fn test_encode_session_shape() {
        let fields = encode_session(&sample()).unwrap();

        assert_eq!(fields["user_id"], json!({"stringValue": "u1"}));
        assert_eq!(
            fields["flashcards"],
            json!({
                "arrayValue": {"values": [{
                    "mapValue": {"fields": {
                        "question": {"stringValue": "Q1"},
                        "answer": {"stringValue": "A1"}
                    }}
                }]}
            })
        );
    }

    #[test]
    fn test_decode_document_from_firestore() {
        // As returned by runQuery, including an empty array with no `values`
        let fields = json!({
            "user_id": {"stringValue": "u1"},
            "notes": {"stringValue": "n"},
            "summary": {"stringValue": "s"},
            "flashcards": {"arrayValue": {}}
        });

        let session = decode_session(fields.as_object().unwrap()).unwrap();
        assert_eq!(session.summary, "s");
        assert!(session.flashcards.is_empty());
    }

    #[test]
    fn test_decode_missing_fields_use_defaults() {
        let fields = json!({"user_id": {"stringValue": "u1"}});

        let session = decode_session(fields.as_object().unwrap()).unwrap();
        assert_eq!(session.summary, "");
        assert!(session.flashcards.is_empty());
    }

    #[test]
    fn test_integer_values_are_strings_on_the_wire() {
        assert_eq!(encode_value(&json!(42)), json!({"integerValue": "42"}));
        assert_eq!(decode_value(&json!({"integerValue": "42"})).unwrap(), json!(42));
        assert_eq!(decode_value(&json!({"doubleValue": 1.5})).unwrap(), json!(1.5));
    }

    #[test]
    fn test_unknown_tag_is_malformed() {
        let result = decode_value(&json!({"geoPointValue": {"latitude": 1.0}}));
        assert!(matches!(result, Err(StoreError::Malformed(_))));
    }
}
