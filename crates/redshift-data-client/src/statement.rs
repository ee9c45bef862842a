//! Statement protocol: paged schema lookup, submit, poll, page results.
//!
//! Every step is strictly sequential. Polling sleeps a fixed interval
//! (one second by default, never less) between `DescribeStatement` calls and
//! imposes no overall timeout; callers wrap [`RedshiftDataClient::run_statement`]
//! in `tokio::time::timeout` if they need one.

use tracing::{debug, info, warn};

use redshift_data_model::input::{
    DescribeStatementInput, DescribeTableInput, ExecuteStatementInput, GetStatementResultInput,
};
use redshift_data_model::output::DescribeStatementOutput;
use redshift_data_model::{ColumnMetadata, Field};

use crate::client::RedshiftDataClient;
use crate::error::{ClientError, ClientResult};

/// All rows of a finished statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    /// Identifier of the statement that produced the rows.
    pub statement_id: String,
    /// False when the statement finished without a result set (DDL, DML).
    pub has_result_set: bool,
    /// Column metadata from the first result page.
    pub column_metadata: Vec<ColumnMetadata>,
    /// Rows in page order, fields in column order.
    pub records: Vec<Vec<Field>>,
}

impl StatementResult {
    /// Whether the statement returned no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows with every field rendered as display text (`NULL` as "").
    #[must_use]
    pub fn string_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|row| row.iter().map(Field::to_display_string).collect())
            .collect()
    }
}

impl RedshiftDataClient {
    /// Fetch every column of a table, following `NextToken`.
    ///
    /// An empty first page means the table does not exist or is not visible
    /// to the caller, and is reported as [`ClientError::SchemaAccess`].
    pub async fn describe_table_columns(
        &self,
        mut input: DescribeTableInput,
    ) -> ClientResult<Vec<ColumnMetadata>> {
        input.next_token = None;
        let first = self.describe_table(&input).await?;
        if first.column_list.is_empty() {
            let table = table_label(&input);
            warn!(%table, "describe table returned no columns");
            return Err(ClientError::SchemaAccess { table });
        }

        let mut columns = first.column_list;
        let mut next_token = non_empty(first.next_token);
        while let Some(token) = next_token {
            input.next_token = Some(token);
            let page = self.describe_table(&input).await?;
            columns.extend(page.column_list);
            next_token = non_empty(page.next_token);
        }

        debug!(columns = columns.len(), "described table");
        Ok(columns)
    }

    /// Poll `DescribeStatement` until the statement reaches a terminal
    /// status.
    ///
    /// Returns the final observation for `FINISHED`; `FAILED` and `ABORTED`
    /// become [`ClientError::StatementFailed`].
    pub async fn wait_for_statement(&self, id: &str) -> ClientResult<DescribeStatementOutput> {
        let input = DescribeStatementInput { id: id.to_owned() };
        let interval = self.config().poll.interval();

        let mut polls: u32 = 1;
        let mut observed = self.describe_statement(&input).await?;
        while !observed.status.is_terminal() {
            debug!(statement_id = id, status = %observed.status, polls, "statement still running");
            tokio::time::sleep(interval).await;
            observed = self.describe_statement(&input).await?;
            polls += 1;
        }

        if observed.status.is_failure() {
            warn!(
                statement_id = id,
                status = %observed.status,
                query_id = ?observed.redshift_query_id,
                error = ?observed.error,
                "statement did not finish"
            );
            let debug = serde_json::to_string_pretty(&observed)
                .unwrap_or_else(|e| format!("unprintable statement description: {e}"));
            return Err(ClientError::StatementFailed {
                statement_id: observed.id,
                query_id: observed.redshift_query_id,
                status: observed.status,
                error: observed.error.unwrap_or_default(),
                debug,
            });
        }

        debug!(statement_id = id, polls, "statement finished");
        Ok(observed)
    }

    /// Page through `GetStatementResult`, starting without a token and
    /// stopping at the first page that carries none.
    pub async fn fetch_all_records(&self, id: &str) -> ClientResult<StatementResult> {
        let mut input = GetStatementResultInput {
            id: id.to_owned(),
            next_token: None,
        };
        let mut result = StatementResult {
            statement_id: id.to_owned(),
            has_result_set: true,
            ..StatementResult::default()
        };

        let mut pages: u32 = 0;
        loop {
            let page = self.get_statement_result(&input).await?;
            pages += 1;
            if result.column_metadata.is_empty() {
                result.column_metadata = page.column_metadata;
            }
            result.records.extend(page.records);
            match non_empty(page.next_token) {
                Some(token) => input.next_token = Some(token),
                None => break,
            }
        }

        debug!(statement_id = id, pages, rows = result.records.len(), "fetched statement result");
        Ok(result)
    }

    /// Submit `input`, wait for it to finish and collect all of its rows.
    ///
    /// A statement that finishes without a result set yields an empty
    /// [`StatementResult`] without calling `GetStatementResult`.
    pub async fn run_statement(&self, input: ExecuteStatementInput) -> ClientResult<StatementResult> {
        let submitted = self.execute_statement(input).await?;
        let finished = self.wait_for_statement(&submitted.id).await?;

        if !finished.has_result_set() {
            info!(statement_id = %finished.id, "statement finished without a result set");
            return Ok(StatementResult {
                statement_id: finished.id,
                ..StatementResult::default()
            });
        }

        let result = self.fetch_all_records(&finished.id).await?;
        info!(
            statement_id = %result.statement_id,
            query_id = ?finished.redshift_query_id,
            rows = result.records.len(),
            "statement completed"
        );
        Ok(result)
    }
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

fn table_label(input: &DescribeTableInput) -> String {
    [
        Some(input.database.as_str()),
        input.schema.as_deref(),
        input.table.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(".")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use redshift_data_model::{RedshiftDataOperation, StatementStatus};

    use super::*;
    use crate::test_support::{ScriptedSender, test_client};

    fn describe_input() -> DescribeTableInput {
        DescribeTableInput {
            database: "dev".to_owned(),
            schema: Some("public".to_owned()),
            table: Some("users".to_owned()),
            workgroup_name: Some("default".to_owned()),
            ..Default::default()
        }
    }

    fn execute_input() -> ExecuteStatementInput {
        ExecuteStatementInput {
            database: "dev".to_owned(),
            sql: "SELECT id, name FROM users".to_owned(),
            workgroup_name: Some("default".to_owned()),
            ..Default::default()
        }
    }

    fn status_body(status: &str) -> String {
        format!(r#"{{"Id":"s1","Status":"{status}","HasResultSet":true}}"#)
    }

    #[tokio::test]
    async fn test_should_accumulate_table_columns_across_pages() {
        let sender = ScriptedSender::new();
        sender.respond(
            RedshiftDataOperation::DescribeTable,
            200,
            r#"{"ColumnList":[{"name":"id","typeName":"int4"}],"NextToken":"t1"}"#,
        );
        sender.respond(
            RedshiftDataOperation::DescribeTable,
            200,
            r#"{"ColumnList":[{"name":"name","typeName":"varchar"}],"TableName":"users"}"#,
        );
        let client = test_client(&sender);

        let columns = client.describe_table_columns(describe_input()).await.unwrap();

        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
        let bodies = sender.bodies_for(RedshiftDataOperation::DescribeTable);
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].get("NextToken").is_none());
        assert_eq!(bodies[1]["NextToken"], "t1");
        assert_eq!(bodies[1]["Table"], "users");
    }

    #[tokio::test]
    async fn test_should_reject_empty_first_column_page() {
        let sender = ScriptedSender::new();
        sender.respond(
            RedshiftDataOperation::DescribeTable,
            200,
            r#"{"ColumnList":[],"NextToken":"t1"}"#,
        );
        let client = test_client(&sender);

        let err = client
            .describe_table_columns(describe_input())
            .await
            .unwrap_err();

        assert!(matches!(&err, ClientError::SchemaAccess { table } if table == "dev.public.users"));
        assert_eq!(sender.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_poll_until_terminal_status() {
        let sender = ScriptedSender::new();
        sender.respond(RedshiftDataOperation::DescribeStatement, 200, &status_body("SUBMITTED"));
        sender.respond(RedshiftDataOperation::DescribeStatement, 200, &status_body("STARTED"));
        sender.respond(RedshiftDataOperation::DescribeStatement, 200, &status_body("FINISHED"));
        let client = test_client(&sender);

        let started = tokio::time::Instant::now();
        let finished = client.wait_for_statement("s1").await.unwrap();

        assert_eq!(finished.status, StatementStatus::Finished);
        assert_eq!(
            sender
                .requests_for(RedshiftDataOperation::DescribeStatement)
                .len(),
            3
        );
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_not_sleep_when_already_finished() {
        let sender = ScriptedSender::new();
        sender.respond(RedshiftDataOperation::DescribeStatement, 200, &status_body("FINISHED"));
        let client = test_client(&sender);

        let started = tokio::time::Instant::now();
        client.wait_for_statement("s1").await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(sender.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_raise_statement_failure_with_query_id() {
        let sender = ScriptedSender::new();
        sender.respond(RedshiftDataOperation::DescribeStatement, 200, &status_body("PICKED"));
        sender.respond(
            RedshiftDataOperation::DescribeStatement,
            200,
            r#"{"Id":"s1","Status":"FAILED","RedshiftQueryId":4711,"Error":"ERROR: relation \"users\" does not exist"}"#,
        );
        let client = test_client(&sender);

        let err = client.wait_for_statement("s1").await.unwrap_err();

        match &err {
            ClientError::StatementFailed {
                statement_id,
                query_id,
                status,
                error,
                debug,
            } => {
                assert_eq!(statement_id, "s1");
                assert_eq!(*query_id, Some(4711));
                assert_eq!(*status, StatementStatus::Failed);
                assert!(error.contains("does not exist"));
                assert!(debug.contains("4711"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Query(4711) failed: ERROR"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_treat_abort_as_failure() {
        let sender = ScriptedSender::new();
        sender.respond(
            RedshiftDataOperation::DescribeStatement,
            200,
            r#"{"Id":"s1","Status":"ABORTED"}"#,
        );
        let client = test_client(&sender);

        let err = client.wait_for_statement("s1").await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::StatementFailed { status: StatementStatus::Aborted, query_id: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_should_accumulate_result_pages_in_order() {
        let sender = ScriptedSender::new();
        sender.respond(
            RedshiftDataOperation::GetStatementResult,
            200,
            r#"{"ColumnMetadata":[{"name":"id","typeName":"int4"}],"Records":[[{"longValue":1}],[{"longValue":2}]],"NextToken":"p2"}"#,
        );
        sender.respond(
            RedshiftDataOperation::GetStatementResult,
            200,
            r#"{"Records":[[{"longValue":3}]],"NextToken":"p3"}"#,
        );
        sender.respond(
            RedshiftDataOperation::GetStatementResult,
            200,
            r#"{"Records":[[{"isNull":true}],[{"longValue":5}]]}"#,
        );
        let client = test_client(&sender);

        let result = client.fetch_all_records("s1").await.unwrap();

        assert_eq!(result.records.len(), 5);
        assert_eq!(result.column_metadata.len(), 1);
        assert_eq!(
            result.string_rows(),
            vec![
                vec!["1".to_owned()],
                vec!["2".to_owned()],
                vec!["3".to_owned()],
                vec![String::new()],
                vec!["5".to_owned()],
            ]
        );
        let bodies = sender.bodies_for(RedshiftDataOperation::GetStatementResult);
        assert!(bodies[0].get("NextToken").is_none());
        assert_eq!(bodies[1]["NextToken"], "p2");
        assert_eq!(bodies[2]["NextToken"], "p3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_skip_result_fetch_without_result_set() {
        let sender = ScriptedSender::new();
        sender.respond(RedshiftDataOperation::ExecuteStatement, 200, r#"{"Id":"s1"}"#);
        sender.respond(
            RedshiftDataOperation::DescribeStatement,
            200,
            r#"{"Id":"s1","Status":"FINISHED","HasResultSet":false}"#,
        );
        let client = test_client(&sender);

        let result = client.run_statement(execute_input()).await.unwrap();

        assert!(result.is_empty());
        assert!(!result.has_result_set);
        assert_eq!(result.statement_id, "s1");
        assert!(
            sender
                .requests_for(RedshiftDataOperation::GetStatementResult)
                .is_empty()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_run_statement_end_to_end() {
        let sender = ScriptedSender::new();
        sender.respond(RedshiftDataOperation::ExecuteStatement, 200, r#"{"Id":"s1"}"#);
        sender.respond(RedshiftDataOperation::DescribeStatement, 200, &status_body("STARTED"));
        sender.respond(RedshiftDataOperation::DescribeStatement, 200, &status_body("FINISHED"));
        sender.respond(
            RedshiftDataOperation::GetStatementResult,
            200,
            r#"{"ColumnMetadata":[{"name":"id","typeName":"int4"},{"name":"name","typeName":"varchar"}],"Records":[[{"longValue":1},{"stringValue":"ada"}]]}"#,
        );
        let client = test_client(&sender);

        let result = client.run_statement(execute_input()).await.unwrap();

        assert!(result.has_result_set);
        assert_eq!(
            result.string_rows(),
            vec![vec!["1".to_owned(), "ada".to_owned()]]
        );
        let ops: Vec<_> = sender
            .requests()
            .iter()
            .filter_map(|r| r.header("x-amz-target").map(ToOwned::to_owned))
            .collect();
        assert_eq!(
            ops,
            vec![
                "RedshiftData.ExecuteStatement",
                "RedshiftData.DescribeStatement",
                "RedshiftData.DescribeStatement",
                "RedshiftData.GetStatementResult",
            ]
        );
    }
}
