use tracing::{debug, info};

use crate::{
    location::{Authorization, LocationProvider},
    protocol::{FieldOrder, LocationReport},
    ReportError,
};

/// The reporting side of the device: reads the last known fix and packs it into a report.
pub struct FinderDevice<P> {
    provider: P,
    field_order: FieldOrder,
}

impl<P: LocationProvider> FinderDevice<P> {
    /// A device reading `provider` and writing coordinates in `field_order`.
    pub fn new(provider: P, field_order: FieldOrder) -> Self {
        Self {
            provider,
            field_order,
        }
    }

    /// Prompt for location access. Called once when the reporting screen loads.
    pub fn request_authorization(&self) -> Authorization {
        let authorization = self.provider.request_authorization();
        info!(?authorization, "requested location access");
        authorization
    }

    /// Build a report from the most recent fix the provider has.
    ///
    /// A pending authorization request does not block reporting; a refused one does.
    pub fn prepare_report(&self) -> Result<LocationReport, ReportError> {
        if self.provider.authorization() == Authorization::Denied {
            return Err(ReportError::PermissionDenied);
        }

        let fix = self
            .provider
            .current_location()
            .ok_or(ReportError::NoFixAvailable)?;

        let report = LocationReport::from_fix(&fix, self.field_order);
        debug!(id = %report.id, fix_time = %report.timestamp, "prepared location report");

        Ok(report)
    }
}
