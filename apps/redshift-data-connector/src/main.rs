//! Redshift Data API connector.
//!
//! Resolves credentials, then answers one request against the configured
//! table and prints the response as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! redshift-data-connector schema
//! redshift-data-connector data request.json
//! echo '{"fields":[{"name":"id"}]}' | redshift-data-connector data -
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_REGION` | `ap-northeast-1` | Data API region |
//! | `REDSHIFT_WORKGROUP_NAME` | *(unset)* | Serverless workgroup |
//! | `REDSHIFT_CLUSTER_IDENTIFIER` | *(unset)* | Provisioned cluster |
//! | `REDSHIFT_DB_USER` | *(unset)* | Database user for provisioned clusters |
//! | `REDSHIFT_DATABASE` | *(required)* | Database name |
//! | `REDSHIFT_SCHEMA` | *(required)* | Schema name |
//! | `REDSHIFT_TABLE` | *(required)* | Table name |
//! | `REDSHIFT_ROLE_ARN` | *(unset)* | Role assumed with the web identity token |
//! | `AWS_WEB_IDENTITY_TOKEN_FILE` | *(unset)* | OIDC token file |
//! | `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN` | *(unset)* | Static credentials |
//! | `REDSHIFT_POLL_INTERVAL_MS` | `1000` | Status poll interval, never below one second |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `json` for structured logs |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod connector;
mod credentials;

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use redshift_data_client::{ClientConfig, ClientError, RedshiftDataClient};
use redshift_data_core::{ConnectorConfig, env_non_empty};

use crate::connector::{Connector, DataRequest};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Schema,
    Data { source: String },
}

fn parse_command(args: &[String]) -> Result<Command> {
    match args {
        [cmd] if cmd == "schema" => Ok(Command::Schema),
        [cmd] if cmd == "data" => Ok(Command::Data {
            source: "-".to_owned(),
        }),
        [cmd, source] if cmd == "data" => Ok(Command::Data {
            source: source.clone(),
        }),
        _ => bail!("usage: redshift-data-connector <schema | data [request.json | -]>"),
    }
}

async fn read_request(source: &str) -> Result<DataRequest> {
    let text = if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read request file {source}"))?
    };
    serde_json::from_str(&text).context("invalid data request")
}

async fn run(command: Command, config: ConnectorConfig) -> Result<()> {
    let client_config = ClientConfig::from_connector(&config);
    let credentials =
        credentials::resolve_credentials(&config, |key| std::env::var(key).ok(), client_config.timeout)
            .await?;
    let client = RedshiftDataClient::new(credentials, client_config)?;
    let connector = Connector::new(config, client)?;

    let output = match command {
        Command::Schema => serde_json::to_string_pretty(&connector.get_schema().await?)?,
        Command::Data { source } => {
            let request = read_request(&source).await?;
            serde_json::to_string_pretty(&connector.get_data(&request).await?)?
        }
    };
    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConnectorConfig::from_env();
    let log_level = config.log_level.clone().unwrap_or_else(|| "info".to_owned());
    let json_logs = env_non_empty("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));
    init_tracing(&log_level, json_logs)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;
    info!(version = VERSION, region = %config.region, ?command, "starting redshift-data-connector");

    let result = run(command, config).await;
    if let Err(err) = &result {
        if let Some(client_err) = err.downcast_ref::<ClientError>() {
            error!(user_error = client_err.is_user_error(), "{client_err}");
            if let Some(debug_text) = client_err.debug_text() {
                debug!(%debug_text, "request failed");
            }
        }
    }
    result
}
