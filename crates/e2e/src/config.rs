//! Harness configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `IDEACENTER_*` environment variables. Credentials are never taken from
//! command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::Credentials;
use crate::error::{HarnessError, HarnessResult};

/// Public IdeaCenter deployment the suite was written against
pub const DEFAULT_BASE_URL: &str =
    "http://softuni-qa-loadbalancer-2137572849.eu-north-1.elb.amazonaws.com:84";

pub const ENV_BASE_URL: &str = "IDEACENTER_BASE_URL";
pub const ENV_TOKEN: &str = "IDEACENTER_TOKEN";
pub const ENV_EMAIL: &str = "IDEACENTER_EMAIL";
pub const ENV_PASSWORD: &str = "IDEACENTER_PASSWORD";
pub const ENV_OUTPUT_DIR: &str = "IDEACENTER_OUTPUT_DIR";

/// Harness configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base endpoint of the API under test
    pub base_url: String,

    /// Pre-issued bearer token; when set, no login call is made
    pub static_token: Option<String>,

    /// Login email, used when no static token is configured
    pub email: Option<String>,

    /// Login password, used when no static token is configured
    pub password: Option<String>,

    /// Directory for the JSON results report
    pub output_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            static_token: None,
            email: None,
            password: None,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("base_url", &self.base_url)
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl HarnessConfig {
    /// Load configuration from file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> HarnessResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> HarnessResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `IDEACENTER_*` overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.static_token = Some(token);
        }
        if let Some(email) = get(ENV_EMAIL) {
            self.email = Some(email);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.password = Some(password);
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }

    /// The credentials active for this run
    pub fn credentials(&self) -> HarnessResult<Credentials> {
        Credentials::select(
            self.static_token.as_deref(),
            self.email.as_deref(),
            self.password.as_deref(),
        )
        .ok_or_else(|| {
            HarnessError::Config(format!(
                "no credentials: set {ENV_TOKEN}, or both {ENV_EMAIL} and {ENV_PASSWORD}"
            ))
        })
    }

    pub fn validate(&self) -> HarnessResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(HarnessError::Config("base_url must not be empty".to_string()));
        }
        reqwest::Url::parse(base)
            .map_err(|e| HarnessError::Config(format!("invalid base_url `{base}`: {e}")))?;
        self.credentials()?;
        Ok(())
    }
}
