//! Client configuration.

use std::time::Duration;

use redshift_data_core::{AwsRegion, ConnectorConfig};

/// Default `User-Agent`, sent unsigned.
pub const DEFAULT_USER_AGENT: &str = concat!("redshift-data-connector/", env!("CARGO_PKG_VERSION"));

/// Signing name and endpoint prefix of the Redshift Data API.
pub const SERVICE_NAME: &str = "redshift-data";

/// Statement polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    interval: Duration,
}

impl PollConfig {
    /// The shortest spacing allowed between two status polls.
    pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

    /// Create a poll configuration. Intervals below one second are raised to
    /// one second.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Self::MIN_INTERVAL),
        }
    }

    /// Time to wait between two `DescribeStatement` calls.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Self::MIN_INTERVAL,
        }
    }
}

/// Settings for [`crate::RedshiftDataClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Region of the Data API endpoint; also the signing region.
    pub region: AwsRegion,
    /// Base URL replacing `https://redshift-data.{region}.amazonaws.com`.
    pub endpoint: Option<String>,
    /// Unsigned `User-Agent` header value.
    pub user_agent: String,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout: Duration,
    /// Status polling.
    pub poll: PollConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: AwsRegion::default(),
            endpoint: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
            poll: PollConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for `region` with default settings.
    #[must_use]
    pub fn new(region: AwsRegion) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }

    /// Derive client settings from the connector configuration.
    #[must_use]
    pub fn from_connector(config: &ConnectorConfig) -> Self {
        let mut client = Self::new(config.region.clone());
        if let Some(ms) = config.poll_interval_ms {
            client.poll = PollConfig::new(Duration::from_millis(ms));
        }
        client
    }

    /// Override the endpoint base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Base URL of the Data API, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_owned(),
            None => format!("https://{}", self.region.service_host(SERVICE_NAME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_clamp_poll_interval() {
        assert_eq!(
            PollConfig::new(Duration::from_millis(10)).interval(),
            Duration::from_secs(1)
        );
        assert_eq!(
            PollConfig::new(Duration::from_secs(3)).interval(),
            Duration::from_secs(3)
        );
        assert_eq!(PollConfig::default().interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_should_build_regional_base_url() {
        let config = ClientConfig::new(AwsRegion::new("us-west-2"));
        assert_eq!(
            config.base_url(),
            "https://redshift-data.us-west-2.amazonaws.com"
        );
        let config = config.with_endpoint("http://localhost:4566/");
        assert_eq!(config.base_url(), "http://localhost:4566");
    }

    #[test]
    fn test_should_derive_from_connector_config() {
        let connector = ConnectorConfig {
            region: AwsRegion::new("eu-central-1"),
            poll_interval_ms: Some(2000),
            ..ConnectorConfig::default()
        };
        let config = ClientConfig::from_connector(&connector);
        assert_eq!(config.region.as_str(), "eu-central-1");
        assert_eq!(config.poll.interval(), Duration::from_secs(2));
    }
}
