//! Catalog columns to schema fields.

use serde::{Deserialize, Serialize};
use tracing::debug;

use redshift_data_model::ColumnMetadata;

use crate::error::{QueryError, QueryResult};
use crate::field_type::FieldType;

/// A column exposed by the connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    /// Column name; also the result alias.
    pub name: String,
    /// Semantic type driving the SQL rendering.
    pub field_type: FieldType,
    /// Catalog type the field was inferred from.
    pub type_name: String,
}

impl SchemaField {
    /// Create a field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            type_name: type_name.into(),
        }
    }

    /// Infer a field from catalog metadata; `None` for unsupported types.
    #[must_use]
    pub fn from_column(column: &ColumnMetadata) -> Option<Self> {
        FieldType::from_type_name(&column.type_name)
            .map(|field_type| Self::new(column.name.clone(), field_type, column.type_name.clone()))
    }
}

/// Map catalog columns to schema fields, in catalog order, dropping columns
/// whose type has no field type.
#[must_use]
pub fn infer_schema(columns: &[ColumnMetadata]) -> Vec<SchemaField> {
    columns
        .iter()
        .filter_map(|column| {
            let field = SchemaField::from_column(column);
            if field.is_none() {
                debug!(column = %column.name, type_name = %column.type_name, "skipping column with unsupported type");
            }
            field
        })
        .collect()
}

/// Pick `names` out of `schema`, in request order.
pub fn select_fields(schema: &[SchemaField], names: &[String]) -> QueryResult<Vec<SchemaField>> {
    if names.is_empty() {
        return Err(QueryError::NoColumns);
    }
    names
        .iter()
        .map(|name| {
            schema
                .iter()
                .find(|field| &field.name == name)
                .cloned()
                .ok_or_else(|| QueryError::UnknownColumn(name.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnMetadata> {
        vec![
            ColumnMetadata::new("id", "int4"),
            ColumnMetadata::new("payload", "super"),
            ColumnMetadata::new("name", "varchar"),
            ColumnMetadata::new("created_at", "timestamp"),
        ]
    }

    #[test]
    fn test_should_infer_schema_in_catalog_order() {
        let schema = infer_schema(&columns());
        let names: Vec<_> = schema.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "created_at"]);
        assert_eq!(schema[2].field_type, FieldType::YearMonthDaySecond);
        assert_eq!(schema[0].type_name, "int4");
    }

    #[test]
    fn test_should_select_fields_in_request_order() {
        let schema = infer_schema(&columns());
        let selected =
            select_fields(&schema, &["created_at".to_owned(), "id".to_owned()]).unwrap();
        assert_eq!(selected[0].name, "created_at");
        assert_eq!(selected[1].name, "id");
    }

    #[test]
    fn test_should_reject_unknown_or_missing_fields() {
        let schema = infer_schema(&columns());
        assert_eq!(
            select_fields(&schema, &["payload".to_owned()]),
            Err(QueryError::UnknownColumn("payload".to_owned()))
        );
        assert_eq!(select_fields(&schema, &[]), Err(QueryError::NoColumns));
    }
}
