//! Conversion between plain JSON and Firestore's typed `Value` encoding.
//!
//! Firestore's REST API wraps every field in a single-key object naming its
//! type (`{"stringValue": "x"}`, `{"integerValue": "42"}` ...). Records are
//! serialized with serde to plain JSON first and then run through [`encode`],
//! and the reverse on the way out, so no entity needs a hand-written mapping.

use serde_json::{Map, Number, Value};

/// Wraps a plain JSON value in Firestore's typed encoding.
pub fn encode(value: Value) -> Value {
    match value {
        Value::Null => json_object("nullValue", Value::Null),
        Value::Bool(b) => json_object("booleanValue", Value::Bool(b)),
        Value::Number(n) => match n.as_i64() {
            // 64-bit integers travel as decimal strings.
            Some(i) => json_object("integerValue", Value::String(i.to_string())),
            None => json_object("doubleValue", Value::Number(n)),
        },
        Value::String(s) => json_object("stringValue", Value::String(s)),
        Value::Array(items) => {
            let values = items.into_iter().map(encode).collect();
            json_object("arrayValue", json_object("values", Value::Array(values)))
        }
        Value::Object(fields) => {
            json_object("mapValue", json_object("fields", Value::Object(encode_fields(fields))))
        }
    }
}

/// Encodes every value of a document's top-level field map.
pub fn encode_fields(fields: Map<String, Value>) -> Map<String, Value> {
    fields.into_iter().map(|(k, v)| (k, encode(v))).collect()
}

/// Unwraps a Firestore typed value into plain JSON.
///
/// Timestamps become RFC 3339 strings and references become their resource
/// name. Geo points and byte blobs have no counterpart in our records and are
/// rejected.
pub fn decode(value: Value) -> Result<Value, String> {
    let Value::Object(wrapper) = value else {
        return Err("expected a typed value object".to_string());
    };
    let mut entries = wrapper.into_iter();
    let (kind, inner) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => return Err("expected exactly one type key".to_string()),
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "stringValue" | "timestampValue" | "referenceValue" => Ok(inner),
        "integerValue" => match &inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(|i| Value::Number(i.into()))
                .map_err(|e| format!("bad integerValue {s:?}: {e}")),
            Value::Number(_) => Ok(inner),
            _ => Err("integerValue must be a string".to_string()),
        },
        "doubleValue" => match inner {
            Value::Number(n) => Ok(Value::Number(n)),
            // NaN and the infinities arrive as strings and cannot be JSON numbers.
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("unrepresentable doubleValue {s:?}")),
            _ => Err("doubleValue must be a number".to_string()),
        },
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(items)) => items.clone(),
                Some(_) => return Err("arrayValue.values must be a list".to_string()),
                None => Vec::new(),
            };
            values.into_iter().map(decode).collect::<Result<_, _>>().map(Value::Array)
        }
        "mapValue" => {
            let fields = match inner {
                Value::Object(mut map) => match map.remove("fields") {
                    Some(Value::Object(fields)) => fields,
                    Some(_) => return Err("mapValue.fields must be an object".to_string()),
                    None => Map::new(),
                },
                _ => return Err("mapValue must be an object".to_string()),
            };
            decode_fields(fields).map(Value::Object)
        }
        other => Err(format!("unsupported value type {other}")),
    }
}

/// Decodes every value of a document's top-level field map.
pub fn decode_fields(fields: Map<String, Value>) -> Result<Map<String, Value>, String> {
    fields
        .into_iter()
        .map(|(k, v)| {
            let decoded = decode(v).map_err(|e| format!("field {k}: {e}"))?;
            Ok((k, decoded))
        })
        .collect()
}

fn json_object(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}
