use thiserror::Error;

/// Why a location report could not be handed to the network.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The location provider has not recorded any fix yet.
    #[error("no location fix is available yet")]
    NoFixAvailable,
    /// The user refused access to the device's position.
    #[error("access to the device location was denied")]
    PermissionDenied,
    /// The credential provider could not produce a username and password.
    #[error("credentials unavailable: {0}")]
    Credentials(#[source] anyhow::Error),
}
