//! Schema inference and SQL compilation.
//!
//! [`infer_schema`] maps catalog columns to [`FieldType`]s; the
//! [`QueryCompiler`] turns a column selection plus an AND-of-ORs filter
//! structure into one `SELECT` whose every column comes back as text.

pub mod compiler;
pub mod error;
pub mod field_type;
pub mod filter;
pub mod schema;

pub use compiler::{CompileOptions, CompiledQuery, QUERY_COMMENT, QueryCompiler};
pub use error::{QueryError, QueryResult};
pub use field_type::FieldType;
pub use filter::{DimensionFilter, FilterGroup, FilterOperator, FilterType};
pub use schema::{SchemaField, infer_schema, select_fields};
