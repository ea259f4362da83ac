use std::{sync::Arc, time::Duration};

use anyhow::Result;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, RequestBuilder, Url,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{protocol::LocationReport, ReportError};

use super::CredentialProvider;

/// Client for the endpoint that collects location reports.
pub struct ReportingServer {
    client: Client,
    endpoint: Url,
    credentials: Arc<dyn CredentialProvider>,
}

/// What became of a dispatched report.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SubmissionOutcome {
    /// The server answered. Its body is logged, never parsed.
    Delivered {
        /// HTTP status code of the response.
        status: u16,
        /// Size of the response body.
        bytes: usize,
    },
    /// The request never produced a response.
    Failed,
}

/// A report in flight. Dropping the handle detaches the request.
#[derive(Debug)]
pub struct SubmissionHandle {
    id: String,
    task: JoinHandle<SubmissionOutcome>,
}

impl SubmissionHandle {
    /// The id of the report being sent.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the request has settled, without waiting for it.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the request to settle.
    pub async fn outcome(self) -> SubmissionOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                error!(id = %self.id, %join_error, "report task did not complete");
                SubmissionOutcome::Failed
            }
        }
    }
}

impl ReportingServer {
    /// Path the collection server listens on.
    pub const LOCATION_PATH: &str = "/api/v1/location";

    /// A client posting to `endpoint`. `timeout` bounds each request.
    pub fn new(
        endpoint: Url,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            credentials,
        })
    }

    /// Send `report` in the background and return at once.
    ///
    /// Transport errors are logged by the background task and never reach the caller.
    pub fn dispatch(&self, report: LocationReport) -> Result<SubmissionHandle, ReportError> {
        let request = self.request(&report)?;
        let id = report.id;

        info!(%id, endpoint = %self.endpoint, "dispatching location report");
        let task = tokio::spawn(deliver(request, id.clone()));

        Ok(SubmissionHandle { id, task })
    }

    fn request(&self, report: &LocationReport) -> Result<RequestBuilder, ReportError> {
        let credentials = self
            .credentials
            .credentials()
            .map_err(ReportError::Credentials)?;

        Ok(self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, credentials.authorization_header())
            .header(CONTENT_TYPE, "application/json")
            .json(report))
    }
}

async fn deliver(request: RequestBuilder, id: String) -> SubmissionOutcome {
    let response = match request.send().await {
        Ok(response) => response,
        Err(error) => {
            error!(%id, %error, "failed to send location report");
            return SubmissionOutcome::Failed;
        }
    };

    let status = response.status();
    match response.bytes().await {
        Ok(body) => {
            info!(
                %id,
                %status,
                bytes = body.len(),
                payload = %String::from_utf8_lossy(&body),
                "location report delivered"
            );
            SubmissionOutcome::Delivered {
                status: status.as_u16(),
                bytes: body.len(),
            }
        }
        Err(error) => {
            error!(%id, %status, %error, "failed to read response to location report");
            SubmissionOutcome::Failed
        }
    }
}
