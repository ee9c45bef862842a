//! Schema and compiled query integration tests.

#[cfg(test)]
mod tests {
    use redshift_data_client::ClientError;
    use redshift_data_model::input::DescribeTableInput;
    use redshift_data_query::{QueryCompiler, infer_schema};

    use crate::{statement, test_client, test_config};

    fn describe_input(config: &redshift_data_core::ConnectorConfig) -> DescribeTableInput {
        DescribeTableInput {
            cluster_identifier: config.cluster_identifier.clone(),
            database: config.database.clone().unwrap_or_default(),
            db_user: config.db_user.clone(),
            schema: config.schema.clone(),
            table: config.table.clone(),
            workgroup_name: config.workgroup_name.clone(),
            ..DescribeTableInput::default()
        }
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_describe_configured_table() {
        let config = test_config().unwrap();
        let client = test_client(&config).unwrap();

        let columns = client
            .describe_table_columns(describe_input(&config))
            .await
            .unwrap();

        assert!(!columns.is_empty());
        assert!(columns.iter().all(|c| !c.name.is_empty()));
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_reject_missing_table() {
        let config = test_config().unwrap();
        let client = test_client(&config).unwrap();
        let mut input = describe_input(&config);
        input.table = Some("no_such_table_for_redshift_data_connector".to_owned());

        let err = client.describe_table_columns(input).await.unwrap_err();

        assert!(matches!(err, ClientError::SchemaAccess { .. }));
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_execute_compiled_query() {
        let config = test_config().unwrap();
        let client = test_client(&config).unwrap();
        let columns = client
            .describe_table_columns(describe_input(&config))
            .await
            .unwrap();
        let schema = infer_schema(&columns);
        let table = config.table_ref().unwrap();

        let compiled = QueryCompiler::default()
            .compile(&table, &schema, None)
            .unwrap();
        let sql = format!("{} LIMIT 10", compiled.sql);
        let result = client.run_statement(statement(&config, sql)).await.unwrap();

        assert!(result.records.len() <= 10);
        for row in result.string_rows() {
            assert_eq!(row.len(), schema.len());
        }
    }
}
