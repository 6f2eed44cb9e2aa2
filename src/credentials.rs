//! 凭证模块：为请求签名提供访问密钥（静态、环境变量、系统钥匙串）。
//!
//! Credentials used to sign Speech Cloud requests.
//!
//! Loading credentials is delegated to a [`CredentialsProvider`]. The crate
//! ships a few small providers; applications with their own secret stores
//! implement the trait themselves.

use crate::{Error, ErrorContext, Result};
use std::env;
use std::sync::Arc;

pub const ACCESS_KEY_ENV: &str = "IVONA_ACCESS_KEY";
pub const SECRET_KEY_ENV: &str = "IVONA_SECRET_KEY";
pub const KEYRING_SERVICE: &str = "ivona-speech-cloud";

/// Access key pair for request signing.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Source of [`Credentials`].
pub trait CredentialsProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials>;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Fixed credentials, typically for tests or injected secrets.
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key, secret_key),
        }
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Reads the key pair from environment variables
/// (`IVONA_ACCESS_KEY` / `IVONA_SECRET_KEY` by default).
pub struct EnvCredentialsProvider {
    access_var: String,
    secret_var: String,
}

impl EnvCredentialsProvider {
    pub fn new() -> Self {
        Self::with_vars(ACCESS_KEY_ENV, SECRET_KEY_ENV)
    }

    pub fn with_vars(access_var: impl Into<String>, secret_var: impl Into<String>) -> Self {
        Self {
            access_var: access_var.into(),
            secret_var: secret_var.into(),
        }
    }

    fn read(var: &str) -> Result<String> {
        env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    format!("environment variable {} is not set", var),
                    ErrorContext::new().with_source("credentials.env"),
                )
            })
    }
}

impl Default for EnvCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialsProvider for EnvCredentialsProvider {
    fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            Self::read(&self.access_var)?,
            Self::read(&self.secret_var)?,
        ))
    }

    fn name(&self) -> &'static str {
        "env"
    }
}

/// Reads the key pair from the OS keyring, stored under the users
/// `access_key` and `secret_key` of a service entry.
pub struct KeyringCredentialsProvider {
    service: String,
}

impl KeyringCredentialsProvider {
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn read(&self, user: &str) -> Result<String> {
        let lookup_error = |e: keyring::Error| {
            Error::configuration_with_context(
                format!("keyring entry {}/{} unavailable", self.service, user),
                ErrorContext::new()
                    .with_source("credentials.keyring")
                    .with_details(e.to_string()),
            )
        };
        keyring::Entry::new(&self.service, user)
            .map_err(lookup_error)?
            .get_password()
            .map_err(lookup_error)
    }
}

impl Default for KeyringCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialsProvider for KeyringCredentialsProvider {
    fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            self.read("access_key")?,
            self.read("secret_key")?,
        ))
    }

    fn name(&self) -> &'static str {
        "keyring"
    }
}

/// Tries each provider in order; the first one that yields credentials wins.
pub struct ChainCredentialsProvider {
    providers: Vec<Arc<dyn CredentialsProvider>>,
}

impl ChainCredentialsProvider {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.providers.push(provider);
        self
    }
}

impl Default for ChainCredentialsProvider {
    /// Keyring first, then environment variables.
    fn default() -> Self {
        Self::new()
            .with_provider(Arc::new(KeyringCredentialsProvider::new()))
            .with_provider(Arc::new(EnvCredentialsProvider::new()))
    }
}

impl CredentialsProvider for ChainCredentialsProvider {
    fn credentials(&self) -> Result<Credentials> {
        let mut tried = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            match provider.credentials() {
                Ok(creds) => return Ok(creds),
                Err(e) => {
                    tracing::debug!(provider = provider.name(), error = %e, "credentials provider failed");
                    tried.push(provider.name());
                }
            }
        }
        Err(Error::configuration_with_context(
            "no credentials available",
            ErrorContext::new()
                .with_source("credentials.chain")
                .with_details(format!("tried: [{}]", tried.join(", "))),
        ))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}
