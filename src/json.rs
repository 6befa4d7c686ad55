//! Bridge between snapshots and `serde_json` documents.
//!
//! JSON text itself stays with `serde_json`; this only converts between its
//! value tree and ours. Times become RFC 3339 strings on the way out, which
//! the setter parses back on the way in.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as Json};

use crate::value::{Mapped, Value};

impl From<Json> for Value {
    fn from(json: Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => number(&n),
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            Json::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

fn number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::I64(i)
    } else if let Some(u) = n.as_u64() {
        Value::U64(u)
    } else {
        n.as_f64().map(Value::F64).unwrap_or(Value::Null)
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Json {
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::I8(v) => Json::from(*v),
            Value::I16(v) => Json::from(*v),
            Value::I32(v) => Json::from(*v),
            Value::I64(v) => Json::from(*v),
            Value::U8(v) => Json::from(*v),
            Value::U16(v) => Json::from(*v),
            Value::U32(v) => Json::from(*v),
            Value::U64(v) => Json::from(*v),
            Value::F32(v) => Json::from(*v),
            Value::F64(v) => Json::from(*v),
            Value::Text(s) => Json::String(s.clone()),
            Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            Value::Time(moment) => Json::String(moment.to_rfc3339()),
            Value::Map(map) => Json::Object(to_object(map)),
            Value::Seq(items) => Json::Array(items.iter().map(Json::from).collect()),
            Value::Opaque(opaque) => Json::String(opaque.type_name().to_owned()),
        }
    }
}

fn to_object(map: &Mapped) -> Map<String, Json> {
    map.iter()
        .map(|(key, value)| (key.clone(), Json::from(value)))
        .collect()
}

/// Converts a JSON object into a snapshot; anything else yields `None`.
pub fn from_json(json: Json) -> Option<Mapped> {
    match Value::from(json) {
        Value::Map(map) => Some(map),
        _ => None,
    }
}

pub fn to_json(mapped: &Mapped) -> Json {
    Json::Object(to_object(mapped))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Json::from(self).serialize(serializer)
    }
}
