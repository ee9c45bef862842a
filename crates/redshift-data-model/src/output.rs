//! Redshift Data API output types.
//!
//! Timestamps are epoch seconds, as `awsJson1_1` encodes them.

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::types::{ColumnMetadata, SqlParameter, StatementStatus};

/// Output of the `DescribeTable` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    /// Columns on this page.
    #[serde(default)]
    pub column_list: Vec<ColumnMetadata>,

    /// Present when more columns remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

/// Output of the `ExecuteStatement` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecuteStatementOutput {
    /// Statement identifier used for polling and result retrieval.
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub db_groups: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_arn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup_name: Option<String>,
}

/// Output of the `DescribeStatement` operation: one status observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeStatementOutput {
    pub id: String,

    pub status: StatementStatus,

    /// Whether `GetStatementResult` has rows to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_result_set: Option<bool>,

    /// Error text for `FAILED` statements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Query identifier assigned by the Redshift cluster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redshift_query_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redshift_pid: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_rows: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_size: Option<i64>,

    /// Elapsed execution time in nanoseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_parameters: Vec<SqlParameter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_batch_statement: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_arn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup_name: Option<String>,
}

impl DescribeStatementOutput {
    /// A bare observation carrying only an id and a status.
    #[must_use]
    pub fn new(id: impl Into<String>, status: StatementStatus) -> Self {
        Self {
            id: id.into(),
            status,
            has_result_set: None,
            error: None,
            redshift_query_id: None,
            redshift_pid: None,
            result_rows: None,
            result_size: None,
            duration: None,
            query_string: None,
            query_parameters: Vec::new(),
            is_batch_statement: None,
            created_at: None,
            updated_at: None,
            cluster_identifier: None,
            database: None,
            db_user: None,
            secret_arn: None,
            workgroup_name: None,
        }
    }

    /// `HasResultSet` is only meaningful once the statement finished; a
    /// missing flag is read as "has rows".
    #[must_use]
    pub fn has_result_set(&self) -> bool {
        self.has_result_set.unwrap_or(true)
    }
}

/// Output of the `GetStatementResult` operation: one page of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetStatementResultOutput {
    #[serde(default)]
    pub column_metadata: Vec<ColumnMetadata>,

    /// Rows on this page, fields in column order.
    #[serde(default)]
    pub records: Vec<Vec<Field>>,

    /// Present when more pages remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_num_rows: Option<i64>,
}
