mod credentials;
mod reporting;
#[cfg(test)]
pub(crate) mod testing;

pub use credentials::{CredentialProvider, Credentials, EnvCredentials};
pub use reporting::{ReportingServer, SubmissionHandle, SubmissionOutcome};
