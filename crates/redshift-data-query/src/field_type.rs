//! Semantic field types and their text renderings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type of a schema field.
///
/// Only the first six are inferred from catalog types; the temporal
/// granularities exist so callers may re-type a date or timestamp column
/// and still get a matching `TO_CHAR` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    /// Integer, decimal and floating point columns.
    Number,
    /// Rendered as `true` / `false`.
    Boolean,
    /// Character columns.
    Text,
    /// `YYYYMMDD`; inferred for `date`.
    YearMonthDay,
    /// `YYYYMMDDHH24MISS`; inferred for timestamps.
    YearMonthDaySecond,
    /// `HH24`; inferred for `time`.
    Hour,
    /// `YYYY`.
    Year,
    /// `YYYYQ`.
    YearQuarter,
    /// `YYYYMM`.
    YearMonth,
    /// `YYYYWW`.
    YearWeek,
    /// `YYYYMMDDHH24`.
    YearMonthDayHour,
    /// `Q`.
    Quarter,
    /// `MM`.
    Month,
    /// `WW`.
    Week,
    /// `MMDD`.
    MonthDay,
    /// `D`, Sunday is 1.
    DayOfWeek,
    /// `DD`.
    Day,
    /// `MI`.
    Minute,
}

impl FieldType {
    /// Infer the field type of a Redshift catalog type name.
    ///
    /// Matching is case-insensitive. Returns `None` for types the connector
    /// does not expose (e.g. `super`, `geometry`, `varbyte`).
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let normalized = type_name.trim().to_ascii_lowercase();
        let field_type = match normalized.as_str() {
            "smallint" | "int2" | "integer" | "int" | "int4" | "bigint" | "int8" | "decimal"
            | "numeric" | "real" | "float4" | "double precision" | "float8" | "float" => {
                Self::Number
            }
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::YearMonthDay,
            "timestamp"
            | "timestamp without time zone"
            | "timestamp with time zone"
            | "timestamptz" => Self::YearMonthDaySecond,
            "time" | "time without time zone" | "time with time zone" | "timetz" => Self::Hour,
            "character" | "char" | "nchar" | "bpchar" | "character varying" | "varchar"
            | "nvarchar" | "text" => Self::Text,
            _ => return None,
        };
        Some(field_type)
    }

    /// Wire name, e.g. `YEAR_MONTH_DAY`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "NUMBER",
            Self::Boolean => "BOOLEAN",
            Self::Text => "TEXT",
            Self::YearMonthDay => "YEAR_MONTH_DAY",
            Self::YearMonthDaySecond => "YEAR_MONTH_DAY_SECOND",
            Self::Hour => "HOUR",
            Self::Year => "YEAR",
            Self::YearQuarter => "YEAR_QUARTER",
            Self::YearMonth => "YEAR_MONTH",
            Self::YearWeek => "YEAR_WEEK",
            Self::YearMonthDayHour => "YEAR_MONTH_DAY_HOUR",
            Self::Quarter => "QUARTER",
            Self::Month => "MONTH",
            Self::Week => "WEEK",
            Self::MonthDay => "MONTH_DAY",
            Self::DayOfWeek => "DAY_OF_WEEK",
            Self::Day => "DAY",
            Self::Minute => "MINUTE",
        }
    }

    /// `TO_CHAR` pattern for temporal types, `None` otherwise.
    #[must_use]
    pub fn to_char_format(&self) -> Option<&'static str> {
        let format = match self {
            Self::Year => "YYYY",
            Self::YearQuarter => "YYYYQ",
            Self::YearMonth => "YYYYMM",
            Self::YearWeek => "YYYYWW",
            Self::YearMonthDay => "YYYYMMDD",
            Self::YearMonthDayHour => "YYYYMMDDHH24",
            Self::YearMonthDaySecond => "YYYYMMDDHH24MISS",
            Self::Quarter => "Q",
            Self::Month => "MM",
            Self::Week => "WW",
            Self::MonthDay => "MMDD",
            Self::DayOfWeek => "D",
            Self::Day => "DD",
            Self::Hour => "HH24",
            Self::Minute => "MI",
            Self::Number | Self::Boolean | Self::Text => return None,
        };
        Some(format)
    }

    /// Whether values are rendered through `TO_CHAR`.
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        self.to_char_format().is_some()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_infer_numeric_types() {
        for name in [
            "smallint",
            "int2",
            "integer",
            "int",
            "int4",
            "bigint",
            "int8",
            "decimal",
            "numeric",
            "real",
            "float4",
            "double precision",
            "float8",
            "float",
        ] {
            assert_eq!(FieldType::from_type_name(name), Some(FieldType::Number), "{name}");
        }
    }

    #[test]
    fn test_should_infer_temporal_and_text_types() {
        assert_eq!(FieldType::from_type_name("date"), Some(FieldType::YearMonthDay));
        assert_eq!(
            FieldType::from_type_name("timestamp with time zone"),
            Some(FieldType::YearMonthDaySecond)
        );
        assert_eq!(FieldType::from_type_name("timetz"), Some(FieldType::Hour));
        assert_eq!(FieldType::from_type_name("BPCHAR"), Some(FieldType::Text));
        assert_eq!(
            FieldType::from_type_name("character varying"),
            Some(FieldType::Text)
        );
        assert_eq!(FieldType::from_type_name("bool"), Some(FieldType::Boolean));
    }

    #[test]
    fn test_should_skip_unsupported_types() {
        assert_eq!(FieldType::from_type_name("super"), None);
        assert_eq!(FieldType::from_type_name("geometry"), None);
        assert_eq!(FieldType::from_type_name(""), None);
    }

    #[test]
    fn test_should_map_temporal_formats() {
        assert_eq!(FieldType::YearMonthDay.to_char_format(), Some("YYYYMMDD"));
        assert_eq!(
            FieldType::YearMonthDaySecond.to_char_format(),
            Some("YYYYMMDDHH24MISS")
        );
        assert_eq!(FieldType::Hour.to_char_format(), Some("HH24"));
        assert_eq!(FieldType::Number.to_char_format(), None);
        assert!(!FieldType::Text.is_temporal());
    }

    #[test]
    fn test_should_serialize_as_wire_name() {
        let json = serde_json::to_string(&FieldType::YearMonthDaySecond).unwrap();
        assert_eq!(json, r#""YEAR_MONTH_DAY_SECOND""#);
        let parsed: FieldType = serde_json::from_str(r#""DAY_OF_WEEK""#).unwrap();
        assert_eq!(parsed, FieldType::DayOfWeek);
        assert_eq!(parsed.to_string(), "DAY_OF_WEEK");
    }
}
