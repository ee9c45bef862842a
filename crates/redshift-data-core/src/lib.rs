//! Core types and configuration for the Redshift Data API connector.
//!
//! This crate provides the building blocks shared by the signer, the
//! statement client and the query compiler: region and table identifiers,
//! and environment-driven connector configuration.

mod config;
mod error;
mod types;

pub use config::{ConnectorConfig, env_non_empty};
pub use error::{CoreError, CoreResult};
pub use types::{AwsRegion, TableRef};
