//! Schema and data requests against one configured table.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use redshift_data_client::RedshiftDataClient;
use redshift_data_core::{ConnectorConfig, TableRef};
use redshift_data_model::input::{DescribeTableInput, ExecuteStatementInput};
use redshift_data_query::{
    FilterGroup, QueryCompiler, QueryError, SchemaField, infer_schema, select_fields,
};

/// A field named in a data request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedField {
    pub name: String,
}

/// Which fields to return and how to filter the rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRequest {
    pub fields: Vec<RequestedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions_filters: Option<FilterGroup>,
}

/// Rows for a [`DataRequest`], every value rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    /// The requested fields, in request order.
    pub schema: Vec<SchemaField>,
    /// One entry per row, values in `schema` order.
    pub rows: Vec<Vec<String>>,
    /// Whether the rows are already filtered; when false the consumer has
    /// to apply the filters itself.
    pub filters_applied: bool,
}

#[derive(Debug, Clone)]
pub struct Connector {
    config: ConnectorConfig,
    table: TableRef,
    client: RedshiftDataClient,
    compiler: QueryCompiler,
}

impl Connector {
    pub fn new(config: ConnectorConfig, client: RedshiftDataClient) -> Result<Self> {
        config.validate()?;
        let table = config.table_ref()?;
        Ok(Self {
            config,
            table,
            client,
            compiler: QueryCompiler::default(),
        })
    }

    /// Fields of the configured table, in catalog order. Columns of
    /// unsupported types are left out.
    pub async fn get_schema(&self) -> Result<Vec<SchemaField>> {
        let columns = self
            .client
            .describe_table_columns(self.describe_table_input())
            .await?;
        let schema = infer_schema(&columns);
        info!(table = %self.table, columns = columns.len(), fields = schema.len(), "loaded schema");
        Ok(schema)
    }

    pub async fn get_data(&self, request: &DataRequest) -> Result<DataResponse> {
        let schema = self.get_schema().await?;
        let names: Vec<String> = request.fields.iter().map(|f| f.name.clone()).collect();
        let selected = select_fields(&schema, &names)?;

        let filters = request.dimensions_filters.as_deref();
        for filter in filters.unwrap_or_default().iter().flatten() {
            if !schema.iter().any(|field| field.name == filter.field_name) {
                return Err(QueryError::UnknownColumn(filter.field_name.clone()).into());
            }
        }

        let compiled = self.compiler.compile(&self.table, &selected, filters)?;
        let result = self
            .client
            .run_statement(self.execute_statement_input(compiled.sql))
            .await?;

        let rows = result.string_rows();
        let filters_applied = compiled.filters_applied && result.has_result_set;
        info!(
            statement_id = %result.statement_id,
            rows = rows.len(),
            filters_applied,
            "served data request"
        );
        Ok(DataResponse {
            schema: selected,
            rows,
            filters_applied,
        })
    }

    fn describe_table_input(&self) -> DescribeTableInput {
        DescribeTableInput {
            cluster_identifier: self.config.cluster_identifier.clone(),
            database: self.table.database.clone(),
            db_user: self.config.db_user.clone(),
            schema: Some(self.table.schema.clone()),
            table: Some(self.table.table.clone()),
            workgroup_name: self.config.workgroup_name.clone(),
            ..DescribeTableInput::default()
        }
    }

    fn execute_statement_input(&self, sql: String) -> ExecuteStatementInput {
        ExecuteStatementInput {
            cluster_identifier: self.config.cluster_identifier.clone(),
            database: self.table.database.clone(),
            db_user: self.config.db_user.clone(),
            sql,
            workgroup_name: self.config.workgroup_name.clone(),
            ..ExecuteStatementInput::default()
        }
    }
}
