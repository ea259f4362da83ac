use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::location::Fix;

/// The JSON body posted to the collection endpoint for a single submission.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct LocationReport {
    /// Random identifier, fresh for every submission.
    pub id: String,
    /// Value written under `latitude`. See [`FieldOrder`].
    pub latitude: f64,
    /// Value written under `longitude`. See [`FieldOrder`].
    pub longitude: f64,
    /// The fix capture time, rendered with [`LocationReport::TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

/// Which device coordinate ends up under which JSON key.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, ValueEnum)]
pub enum FieldOrder {
    /// Longitude under `latitude` and latitude under `longitude`, as the
    /// deployed collection server has always received them.
    #[default]
    Legacy,
    /// Each coordinate under its own key.
    Canonical,
}

impl LocationReport {
    /// `2024-01-01 00:00:00 +0000`
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

    /// Build a report for `fix` with a freshly generated id.
    pub fn from_fix(fix: &Fix, order: FieldOrder) -> Self {
        Self::with_id(Uuid::new_v4(), fix, order)
    }

    /// Build a report for `fix` under a caller-chosen id.
    pub fn with_id(id: Uuid, fix: &Fix, order: FieldOrder) -> Self {
        let (latitude, longitude) = match order {
            FieldOrder::Legacy => (fix.coordinate.longitude, fix.coordinate.latitude),
            FieldOrder::Canonical => (fix.coordinate.latitude, fix.coordinate.longitude),
        };

        Self {
            id: id.hyphenated().to_string().to_uppercase(),
            latitude,
            longitude,
            timestamp: fix.timestamp.format(Self::TIMESTAMP_FORMAT).to_string(),
        }
    }
}
