//! Redshift Data API model types.
//!
//! Hand-written request and response shapes for the four statement
//! operations the connector drives. The Data API speaks `awsJson1_1`:
//! top-level members are `PascalCase`, while column metadata and record
//! fields use `camelCase` keys.
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)]

pub mod error;
pub mod field;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use error::{RedshiftDataError, RedshiftDataErrorCode};
pub use field::Field;
pub use operations::RedshiftDataOperation;
pub use types::{ColumnMetadata, SqlParameter, StatementStatus};
