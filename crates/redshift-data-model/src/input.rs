//! Redshift Data API input types.
//!
//! All input structs use `PascalCase` JSON field naming to match the
//! `awsJson1_1` wire protocol. Optional fields are omitted when `None`.

use serde::{Deserialize, Serialize};

use crate::types::SqlParameter;

/// Input for the `DescribeTable` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableInput {
    /// Provisioned cluster identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_identifier: Option<String>,

    /// Database to describe when it differs from the connected one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_database: Option<String>,

    /// Database to connect to.
    pub database: String,

    /// Database user (temporary credentials for provisioned clusters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,

    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,

    /// Continuation token from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,

    /// Schema containing the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Secrets Manager secret holding database credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_arn: Option<String>,

    /// Table to describe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Redshift Serverless workgroup name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup_name: Option<String>,
}

/// Input for the `ExecuteStatement` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecuteStatementInput {
    /// Idempotency token. Derived from the SQL text when left empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_identifier: Option<String>,

    pub database: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,

    /// Values for `:name` placeholders in `sql`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<SqlParameter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_arn: Option<String>,

    /// Statement text.
    pub sql: String,

    /// Label shown in the statement history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_name: Option<String>,

    /// Send an EventBridge event when the statement finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_event: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup_name: Option<String>,
}

/// Input for the `DescribeStatement` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeStatementInput {
    /// Statement identifier returned by `ExecuteStatement`.
    pub id: String,
}

/// Input for the `GetStatementResult` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetStatementResultInput {
    /// Statement identifier returned by `ExecuteStatement`.
    pub id: String,

    /// Continuation token from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
