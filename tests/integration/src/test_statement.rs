//! Statement lifecycle integration tests.

#[cfg(test)]
mod tests {
    use redshift_data_client::ClientError;
    use redshift_data_model::{Field, StatementStatus};

    use crate::{statement, test_client, test_config, unique_tag};

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_run_select_and_collect_rows() {
        let config = test_config().unwrap();
        let client = test_client(&config).unwrap();
        let sql = format!("SELECT 1 AS one, 'a' AS letter, NULL AS nothing /* {} */", unique_tag());

        let result = client.run_statement(statement(&config, sql)).await.unwrap();

        assert!(result.has_result_set);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.column_metadata.len(), 3);
        assert_eq!(result.records[0][0], Field::Long(1));
        assert_eq!(result.string_rows()[0], vec!["1", "a", ""]);
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_page_through_large_result() {
        let config = test_config().unwrap();
        let client = test_client(&config).unwrap();
        // Wide rows push the result past one page.
        let sql = format!(
            "WITH RECURSIVE t(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM t WHERE n < 200) \
             SELECT n, REPEAT('x', 60000) AS pad FROM t /* {} */",
            unique_tag()
        );

        let result = client.run_statement(statement(&config, sql)).await.unwrap();

        assert_eq!(result.records.len(), 200);
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_report_failed_statement() {
        let config = test_config().unwrap();
        let client = test_client(&config).unwrap();
        let sql = format!("SELECT * FROM no_such_table_{}", unique_tag());

        let err = client.run_statement(statement(&config, sql)).await.unwrap_err();

        match err {
            ClientError::StatementFailed { status, error, .. } => {
                assert_eq!(status, StatementStatus::Failed);
                assert!(!error.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_finish_without_result_set() {
        let config = test_config().unwrap();
        let client = test_client(&config).unwrap();
        let table = format!("tmp_{}", unique_tag());
        let sql = format!("CREATE TEMP TABLE {table} (id INT)");

        let result = client.run_statement(statement(&config, sql)).await.unwrap();

        assert!(!result.has_result_set);
        assert!(result.is_empty());
    }
}
