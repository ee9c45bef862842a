//! Record `Field` type with custom serialization.
//!
//! A field is a tagged union on the wire: `{"stringValue": "a"}`,
//! `{"longValue": 1}`, `{"isNull": true}` and so on. `isNull: true` wins
//! over any value key that may accompany it.

use std::fmt;

use base64::Engine;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One cell of a result record.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// SQL `NULL`.
    Null,
    /// Text value.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Floating point value.
    Double(f64),
    /// Integer value.
    Long(i64),
    /// Binary value (base64 on the wire).
    Blob(Vec<u8>),
}

impl Field {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the field as text: `NULL` becomes the empty string, blobs are
    /// shown as base64.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::String(s) => s.clone(),
            Self::Boolean(b) => b.to_string(),
            Self::Double(d) => d.to_string(),
            Self::Long(l) => l.to_string(),
            Self::Blob(b) => base64::engine::general_purpose::STANDARD.encode(b),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Null => map.serialize_entry("isNull", &true)?,
            Self::String(s) => map.serialize_entry("stringValue", s)?,
            Self::Boolean(b) => map.serialize_entry("booleanValue", b)?,
            Self::Double(d) => map.serialize_entry("doubleValue", d)?,
            Self::Long(l) => map.serialize_entry("longValue", l)?,
            Self::Blob(b) => map.serialize_entry(
                "blobValue",
                &base64::engine::general_purpose::STANDARD.encode(b),
            )?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldVisitor)
    }
}

struct FieldVisitor;

impl<'de> Visitor<'de> for FieldVisitor {
    type Value = Field;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a Redshift Data API Field object")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let mut is_null = false;
        let mut value: Option<Field> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "isNull" => is_null = map.next_value::<Option<bool>>()?.unwrap_or(false),
                "stringValue" => set_once(&mut value, Field::String(map.next_value()?)),
                "booleanValue" => set_once(&mut value, Field::Boolean(map.next_value()?)),
                "doubleValue" => set_once(&mut value, Field::Double(map.next_value()?)),
                "longValue" => set_once(&mut value, Field::Long(map.next_value()?)),
                "blobValue" => {
                    let encoded: String = map.next_value()?;
                    let decoded = base64::engine::general_purpose::STANDARD
                        .decode(&encoded)
                        .map_err(de::Error::custom)?;
                    set_once(&mut value, Field::Blob(decoded));
                }
                // arrayValue and any future members are not surfaced.
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        if is_null {
            return Ok(Field::Null);
        }
        Ok(value.unwrap_or(Field::Null))
    }
}

fn set_once(slot: &mut Option<Field>, field: Field) {
    if slot.is_none() {
        *slot = Some(field);
    }
}
