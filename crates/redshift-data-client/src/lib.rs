//! Signed Redshift Data API client.
//!
//! [`RedshiftDataClient`] signs every call with SigV4, sends it through an
//! [`HttpSend`] implementation and classifies the response. On top of the
//! four single-shot operations it implements the statement protocol:
//! submit, poll `DescribeStatement` until a terminal status, then page
//! through `GetStatementResult`.
//!
//! Temporary credentials are obtained with [`StsClient`] by exchanging a web
//! identity token.
//!
//! ```no_run
//! use redshift_data_auth::Credentials;
//! use redshift_data_client::{ClientConfig, RedshiftDataClient};
//! use redshift_data_model::input::ExecuteStatementInput;
//!
//! # tokio_test::block_on(async {
//! let credentials = Credentials::new("AKIDEXAMPLE", "secret");
//! let client = RedshiftDataClient::new(credentials, ClientConfig::default())?;
//! let result = client
//!     .run_statement(ExecuteStatementInput {
//!         database: "dev".to_owned(),
//!         sql: "SELECT 1".to_owned(),
//!         workgroup_name: Some("default".to_owned()),
//!         ..Default::default()
//!     })
//!     .await?;
//! assert_eq!(result.string_rows(), vec![vec!["1".to_owned()]]);
//! # Ok::<(), redshift_data_client::ClientError>(())
//! # }).unwrap();
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod statement;
pub mod sts;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::RedshiftDataClient;
pub use config::{ClientConfig, PollConfig};
pub use error::{ClientError, ClientResult};
pub use statement::StatementResult;
pub use sts::{AssumeRoleWithWebIdentityRequest, AssumeRoleWithWebIdentityResult, StsClient};
pub use transport::{HttpRequest, HttpResponse, HttpSend, ReqwestSender};
