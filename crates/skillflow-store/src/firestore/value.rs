//! Conversion between plain JSON and Firestore's typed `Value` encoding.

use serde_json::{json, Map, Value};

use crate::StoreError;

/// A decoded Firestore document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Full resource name, `projects/../documents/..`.
    pub name: String,
    pub fields: Map<String, Value>,
    pub update_time: Option<String>,
}

impl Document {
    /// Last path segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Decode a document resource as returned by GET or runQuery.
    pub fn from_resource(resource: &Value) -> Result<Self, StoreError> {
        let name = resource["name"]
            .as_str()
            .ok_or_else(|| StoreError::Codec("document without name".into()))?
            .to_string();
        let fields = match resource.get("fields") {
            Some(fields) => decode_fields(fields)?,
            None => Map::new(),
        };
        Ok(Self {
            name,
            fields,
            update_time: resource["updateTime"].as_str().map(str::to_string),
        })
    }

    /// Deserialize the fields into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| StoreError::Codec(format!("{}: {e}", self.name)))
    }
}

/// Encode a plain JSON value as a Firestore `Value`.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore carries int64 as a decimal string.
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode an object's members as a Firestore `fields` map.
pub fn encode_fields(map: &Map<String, Value>) -> Value {
    let fields: Map<String, Value> = map
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    Value::Object(fields)
}

/// Decode a Firestore `Value` into plain JSON. Timestamps and references
/// become strings.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| StoreError::Codec(format!("expected typed value, got {value}")))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| StoreError::Codec("empty typed value".into()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| StoreError::Codec(format!("bad integerValue {inner}")))
        }
        "arrayValue" => {
            let values = match inner.get("values").and_then(Value::as_array) {
                Some(values) => values.iter().map(decode_value).collect::<Result<_, _>>()?,
                None => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields") {
            Some(fields) => Ok(Value::Object(decode_fields(fields)?)),
            None => Ok(Value::Object(Map::new())),
        },
        "geoPointValue" => Ok(inner.clone()),
        other => Err(StoreError::Codec(format!("unsupported value kind {other}"))),
    }
}

/// Decode a Firestore `fields` map into a plain JSON object.
pub fn decode_fields(fields: &Value) -> Result<Map<String, Value>, StoreError> {
    let obj = fields
        .as_object()
        .ok_or_else(|| StoreError::Codec("fields is not an object".into()))?;
    obj.iter()
        .map(|(k, v)| decode_value(v).map(|d| (k.clone(), d)))
        .collect()
}
