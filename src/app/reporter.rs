use std::sync::Arc;

use crate::{
    finder::FinderDevice,
    location::{Authorization, LocationProvider},
    server::{ReportingServer, SubmissionHandle},
    ReportError,
};

/// The screen with the one button that reports the device's position.
pub struct ReporterScreen<P> {
    finder: FinderDevice<P>,
    server: Arc<ReportingServer>,
}

impl<P: LocationProvider> ReporterScreen<P> {
    /// A screen reporting through `server`.
    pub fn new(finder: FinderDevice<P>, server: Arc<ReportingServer>) -> Self {
        Self { finder, server }
    }

    /// Prompt for location access, as the screen does once when it first appears.
    pub fn load(&self) -> Authorization {
        self.finder.request_authorization()
    }

    /// Report the last known fix. Returns as soon as the request is in flight.
    pub fn submit_current_location(&self) -> Result<SubmissionHandle, ReportError> {
        let report = self.finder.prepare_report()?;
        self.server.dispatch(report)
    }
}
