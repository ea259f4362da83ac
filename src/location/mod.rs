use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A last-known-fix cache shared between position feeds and readers.
mod cached;
/// Feeding NMEA 0183 receiver output into a [`CachedLocation`].
mod nmea;

pub use cached::CachedLocation;
pub use nmea::NmeaFeed;

/// A geographical position in decimal degrees.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Coordinate {
    /// Latitude, positive north of the equator.
    pub latitude: f64,
    /// Longitude, positive east of Greenwich.
    pub longitude: f64,
}

impl Coordinate {
    /// Whether both components lie within their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A position together with the time the device captured it.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Fix {
    /// Where the device was.
    pub coordinate: Coordinate,
    /// When the device recorded the position. Assigned by the device, not the server.
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    /// Build a fix from raw latitude and longitude.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate: Coordinate {
                latitude,
                longitude,
            },
            timestamp,
        }
    }
}

/// Whether the user has allowed access to the device's position.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum Authorization {
    /// Access has not been requested yet, or the request is still pending.
    #[default]
    NotDetermined,
    /// The user refused access.
    Denied,
    /// The user allowed access.
    Authorized,
}

/// A source of the device's last known position.
pub trait LocationProvider: Send + Sync {
    /// Ask for access to the device's position and return the resulting state.
    fn request_authorization(&self) -> Authorization;

    /// The current authorization state, without prompting.
    fn authorization(&self) -> Authorization;

    /// The most recently recorded fix. This is not a fresh reading.
    fn current_location(&self) -> Option<Fix>;
}

impl<T: LocationProvider + ?Sized> LocationProvider for Arc<T> {
    fn request_authorization(&self) -> Authorization {
        (**self).request_authorization()
    }

    fn authorization(&self) -> Authorization {
        (**self).authorization()
    }

    fn current_location(&self) -> Option<Fix> {
        (**self).current_location()
    }
}
