use std::{env, fmt};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as b64, Engine as _};

/// Supplies the Basic credentials for each submission.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// The credentials to attach to the next request.
    fn credentials(&self) -> Result<Credentials>;
}

/// A username and password pair for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Credentials from a fixed username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The `Authorization` header value: `Basic ` and base64 of `username:password`.
    pub fn authorization_header(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!("Basic {}", b64.encode(pair))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialProvider for Credentials {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.clone())
    }
}

/// Reads the username and password from environment variables on every submission.
#[derive(Clone, Debug)]
pub struct EnvCredentials {
    username_var: String,
    password_var: String,
}

impl EnvCredentials {
    /// Variables read by [`EnvCredentials::default`].
    pub const USERNAME_VAR: &str = "FISHFINDR_USERNAME";
    /// See [`EnvCredentials::USERNAME_VAR`].
    pub const PASSWORD_VAR: &str = "FISHFINDR_PASSWORD";

    /// Read the credentials from the two named variables.
    pub fn new(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(Self::USERNAME_VAR, Self::PASSWORD_VAR)
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials> {
        let username = env::var(&self.username_var)
            .with_context(|| format!("reading {}", self.username_var))?;
        let password = env::var(&self.password_var)
            .with_context(|| format!("reading {}", self.password_var))?;

        Ok(Credentials::new(username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let credentials = Credentials::new("user", "pass");

        assert_eq!(credentials.authorization_header(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_authorization_header_matches_base64_of_pair() {
        let credentials = Credentials::new("jcorrenti13", "hunter2:with-colon");
        let header = credentials.authorization_header();

        let encoded = header.strip_prefix("Basic ").expect("Basic scheme");
        let decoded = b64.decode(encoded).unwrap();
        assert_eq!(decoded, b"jcorrenti13:hunter2:with-colon");
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("user", "s3cret"));

        assert!(rendered.contains("user"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_env_credentials() {
        // unique names so parallel tests never race on the same variables
        env::set_var("FISHFINDR_TEST_ENV_USER", "alice");
        env::set_var("FISHFINDR_TEST_ENV_PASS", "wonderland");
        let provider = EnvCredentials::new("FISHFINDR_TEST_ENV_USER", "FISHFINDR_TEST_ENV_PASS");

        let credentials = provider.credentials().unwrap();

        assert_eq!(credentials, Credentials::new("alice", "wonderland"));
    }

    #[test]
    fn test_env_credentials_missing() {
        let provider = EnvCredentials::new("FISHFINDR_TEST_UNSET_USER", "FISHFINDR_TEST_UNSET_PASS");

        let error = provider.credentials().unwrap_err();

        assert!(error.to_string().contains("FISHFINDR_TEST_UNSET_USER"));
    }
}
