//! Reports a device's last known position to a collection endpoint.

#![warn(missing_docs)]

/// The terminal front end: a tab host with a reporting screen and a map screen.
pub mod app;
/// Runtime configuration assembled from flags, the environment and `.env`.
pub mod config;
/// Errors surfaced when a report cannot be prepared.
pub mod error;
/// Turns the device's last known fix into a report.
pub mod finder;
/// Sources of the device's position.
pub mod location;
/// Types sent over the wire to the collection endpoint.
pub mod protocol;
/// Tools for talking to the collection endpoint.
pub mod server;

pub use error::ReportError;
