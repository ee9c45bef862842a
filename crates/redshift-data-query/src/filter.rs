//! Dimension filters.
//!
//! A filter set is an AND of OR-groups: every inner list is a disjunction of
//! atomic filters, and the outer list joins those disjunctions with `AND`.

use serde::{Deserialize, Serialize};

/// Comparison performed by a [`DimensionFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Value equals one of the given values.
    Equals,
    /// Same rendering as [`FilterOperator::Equals`].
    InList,
    /// Substring match (`LIKE '%v%'`).
    Contains,
    /// POSIX regular expression match anywhere in the value.
    RegexpPartialMatch,
    /// Regular expression match; rendered like the partial match.
    RegexpExactMatch,
    /// Value is `NULL`.
    IsNull,
    /// Inclusive range over the first two values.
    Between,
    /// `>` against each value.
    NumericGreaterThan,
    /// `>=` against each value.
    NumericGreaterThanOrEqual,
    /// `<` against each value.
    NumericLessThan,
    /// `<=` against each value.
    NumericLessThanOrEqual,
    /// An operator the compiler cannot render.
    Unknown(String),
}

impl FilterOperator {
    /// Returns the wire-format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "EQUALS",
            Self::InList => "IN_LIST",
            Self::Contains => "CONTAINS",
            Self::RegexpPartialMatch => "REGEXP_PARTIAL_MATCH",
            Self::RegexpExactMatch => "REGEXP_EXACT_MATCH",
            Self::IsNull => "IS_NULL",
            Self::Between => "BETWEEN",
            Self::NumericGreaterThan => "NUMERIC_GREATER_THAN",
            Self::NumericGreaterThanOrEqual => "NUMERIC_GREATER_THAN_OR_EQUAL",
            Self::NumericLessThan => "NUMERIC_LESS_THAN",
            Self::NumericLessThanOrEqual => "NUMERIC_LESS_THAN_OR_EQUAL",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// SQL comparison operator for the numeric comparisons.
    #[must_use]
    pub fn comparison(&self) -> Option<&'static str> {
        match self {
            Self::NumericGreaterThan => Some(">"),
            Self::NumericGreaterThanOrEqual => Some(">="),
            Self::NumericLessThan => Some("<"),
            Self::NumericLessThanOrEqual => Some("<="),
            _ => None,
        }
    }
}

impl From<&str> for FilterOperator {
    fn from(s: &str) -> Self {
        match s {
            "EQUALS" => Self::Equals,
            "IN_LIST" => Self::InList,
            "CONTAINS" => Self::Contains,
            "REGEXP_PARTIAL_MATCH" => Self::RegexpPartialMatch,
            "REGEXP_EXACT_MATCH" => Self::RegexpExactMatch,
            "IS_NULL" => Self::IsNull,
            "BETWEEN" => Self::Between,
            "NUMERIC_GREATER_THAN" => Self::NumericGreaterThan,
            "NUMERIC_GREATER_THAN_OR_EQUAL" => Self::NumericGreaterThanOrEqual,
            "NUMERIC_LESS_THAN" => Self::NumericLessThan,
            "NUMERIC_LESS_THAN_OR_EQUAL" => Self::NumericLessThanOrEqual,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl Serialize for FilterOperator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterOperator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether matching rows are kept or dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    /// Keep matching rows.
    #[default]
    Include,
    /// Drop matching rows.
    Exclude,
}

/// One atomic filter on a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    /// Field (column) the filter applies to.
    pub field_name: String,
    /// Operand values, as text.
    #[serde(default)]
    pub values: Vec<String>,
    /// Comparison to perform.
    pub operator: FilterOperator,
    /// Include or exclude matching rows.
    #[serde(rename = "type", default)]
    pub filter_type: FilterType,
}

impl DimensionFilter {
    /// Create an including filter.
    #[must_use]
    pub fn new<I, V>(field_name: impl Into<String>, operator: FilterOperator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            field_name: field_name.into(),
            values: values.into_iter().map(Into::into).collect(),
            operator,
            filter_type: FilterType::Include,
        }
    }

    /// Turn the filter into an excluding one.
    #[must_use]
    pub fn exclude(mut self) -> Self {
        self.filter_type = FilterType::Exclude;
        self
    }

    /// Whether matching rows are dropped.
    #[must_use]
    pub fn is_exclude(&self) -> bool {
        self.filter_type == FilterType::Exclude
    }
}

/// AND of OR-groups of filters.
pub type FilterGroup = Vec<Vec<DimensionFilter>>;
