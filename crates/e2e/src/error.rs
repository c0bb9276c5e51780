//! Error types for the contract harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("authentication failed (HTTP {status})")]
    AuthenticationFailed { status: u16 },

    #[error("token missing in response")]
    TokenMissing,

    #[error("Access token is not a valid header value: {0}")]
    InvalidToken(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Missing fixture: {0}")]
    MissingFixture(&'static str),

    #[error("Unknown case: {0}")]
    CaseNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl HarnessError {
    /// Setup-time failures that abort the whole run
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            HarnessError::AuthenticationFailed { .. }
                | HarnessError::TokenMissing
                | HarnessError::InvalidToken(_)
        )
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
