use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Args;
use reqwest::Url;
use thiserror::Error;

use crate::{
    location::Coordinate,
    protocol::FieldOrder,
    server::{CredentialProvider, Credentials, EnvCredentials},
};

/// Flags shared by every subcommand. Each one can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct ReporterArgs {
    /// URL location reports are posted to, e.g. `https://example.org/api/v1/location`.
    #[arg(long, env = "FISHFINDR_ENDPOINT")]
    pub endpoint: Url,

    /// Basic auth username. Without it, credentials are read from
    /// FISHFINDR_USERNAME and FISHFINDR_PASSWORD on every submission.
    #[arg(long, requires = "password")]
    pub username: Option<String>,

    /// Basic auth password.
    #[arg(long, requires = "username")]
    pub password: Option<String>,

    /// Which device coordinate is written under which JSON key.
    #[arg(long, env = "FISHFINDR_FIELD_ORDER", value_enum, default_value_t = FieldOrder::Legacy)]
    pub field_order: FieldOrder,

    /// Request timeout in seconds. The HTTP client default applies when unset.
    #[arg(long, env = "FISHFINDR_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Seed the location cache with this latitude.
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Seed the location cache with this longitude.
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Read NMEA 0183 sentences from this file or device. `report` stops at
    /// the first fix; `run` keeps reading.
    #[arg(long, env = "FISHFINDR_NMEA")]
    pub nmea: Option<PathBuf>,
}

/// Problems found while validating [`ReporterArgs`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The endpoint is not an HTTP(S) URL.
    #[error("endpoint must use http or https, got {0}")]
    UnsupportedScheme(String),
    /// The seed position lies outside valid latitude/longitude ranges.
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    #[allow(missing_docs)]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },
    /// `--timeout-secs 0`.
    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

/// Everything the reporter needs at runtime.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Where reports are posted.
    pub endpoint: Url,
    /// Source of the Basic credentials.
    pub credentials: Arc<dyn CredentialProvider>,
    /// Key assignment for the coordinates.
    pub field_order: FieldOrder,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// Position to seed the cache with at startup.
    pub initial_fix: Option<Coordinate>,
    /// NMEA source feeding the cache.
    pub nmea: Option<PathBuf>,
}

impl ReporterArgs {
    /// Validate the flags and resolve them into a [`ReporterConfig`].
    pub fn into_config(self) -> Result<ReporterConfig, ConfigError> {
        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(
                self.endpoint.scheme().to_string(),
            ));
        }

        let credentials: Arc<dyn CredentialProvider> = match (self.username, self.password) {
            (Some(username), Some(password)) => Arc::new(Credentials::new(username, password)),
            // clap enforces that both or neither are given
            _ => Arc::new(EnvCredentials::default()),
        };

        let timeout = match self.timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let initial_fix = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                let coordinate = Coordinate {
                    latitude,
                    longitude,
                };
                if !coordinate.is_valid() {
                    return Err(ConfigError::CoordinateOutOfRange {
                        latitude,
                        longitude,
                    });
                }
                Some(coordinate)
            }
            _ => None,
        };

        Ok(ReporterConfig {
            endpoint: self.endpoint,
            credentials,
            field_order: self.field_order,
            timeout,
            initial_fix,
            nmea: self.nmea,
        })
    }
}
