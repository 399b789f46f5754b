//! Generic nested value produced by the schema loader.
//!
//! Unlike `serde_json::Value`, objects are kept as ordered key/value lists:
//! entries stay in the order they appear in the source, and a key written
//! twice shows up twice instead of silently replacing the earlier entry.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// A syntactically parsed value with no schema applied.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<RawValue>),
    Object(Vec<(String, RawValue)>),
}

impl RawValue {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "a boolean",
            RawValue::Integer(_) => "an integer",
            RawValue::Float(_) => "a float",
            RawValue::String(_) => "a string",
            RawValue::Array(_) => "a list",
            RawValue::Object(_) => "a mapping",
        }
    }

    pub fn as_object(&self) -> Option<&[(String, RawValue)]> {
        match self {
            RawValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Look up a key in an object. When a key repeats, the last entry wins,
    /// matching how JSON readers usually treat repeated fields.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.as_object()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any structured data value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawValue, E> {
        Ok(RawValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
        Ok(RawValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
        // Out-of-range integers degrade to floats rather than failing the parse;
        // the model builder rejects them as non-integers.
        Ok(match i64::try_from(v) {
            Ok(n) => RawValue::Integer(n),
            Err(_) => RawValue::Float(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
        Ok(RawValue::Float(v))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<RawValue, E> {
        Ok(RawValue::String(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawValue, D::Error> {
        RawValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(RawValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawValue, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, RawValue>()? {
            entries.push((key, value));
        }
        Ok(RawValue::Object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawValue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn object_keeps_encounter_order() {
        let value = parse(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#);
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn object_keeps_repeated_keys() {
        let value = parse(r#"{"agitator": {"limit": 5}, "agitator": {"limit": 7}}"#);
        let entries = value.as_object().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "agitator");
        assert_eq!(entries[1].0, "agitator");
    }

    #[test]
    fn get_prefers_last_repeated_field() {
        let value = parse(r#"{"limit": 5, "limit": 7}"#);
        assert_eq!(value.get("limit"), Some(&RawValue::Integer(7)));
        assert_eq!(value.get("absent"), None);
    }

    #[test]
    fn scalars() {
        let value = parse(r#"[null, true, -3, 2.5, "x", 18446744073709551615]"#);
        let items = value.as_array().unwrap();
        assert_eq!(items[0], RawValue::Null);
        assert_eq!(items[1], RawValue::Bool(true));
        assert_eq!(items[2].as_i64(), Some(-3));
        assert_eq!(items[3], RawValue::Float(2.5));
        assert_eq!(items[4].as_str(), Some("x"));
        assert!(matches!(items[5], RawValue::Float(_)));
    }

    #[test]
    fn ron_map_parses() {
        let value: RawValue =
            ron::from_str(r#"{ "skills": { "agitator": { "name": "Agitator", "limit": 5 } } }"#)
                .unwrap();
        let skill = value.get("skills").and_then(|s| s.get("agitator")).unwrap();
        assert_eq!(skill.get("name").and_then(RawValue::as_str), Some("Agitator"));
        assert_eq!(skill.get("limit").and_then(RawValue::as_i64), Some(5));
    }

    #[test]
    fn kind_names() {
        assert_eq!(RawValue::Integer(1).kind(), "an integer");
        assert_eq!(RawValue::Object(Vec::new()).kind(), "a mapping");
        assert_eq!(RawValue::Array(Vec::new()).kind(), "a list");
    }
}
