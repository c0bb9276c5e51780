//! Credential resolution and the one-shot login call

use ideacenter_common::{paths, AuthRequest, AuthResponse};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::session::endpoint;

/// Credentials active for a run. A static token always wins over a login.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    StaticToken(String),
    Login { email: String, password: String },
}

impl Credentials {
    /// Pick the credentials to use: a non-blank static token first, then a
    /// complete email/password pair. `None` if neither is usable.
    pub fn select(
        static_token: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Option<Self> {
        if let Some(token) = static_token.filter(|t| !t.trim().is_empty()) {
            return Some(Credentials::StaticToken(token.to_string()));
        }

        match (email, password) {
            (Some(email), Some(password))
                if !email.trim().is_empty() && !password.is_empty() =>
            {
                Some(Credentials::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                })
            }
            _ => None,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Credentials::StaticToken(_))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::StaticToken(_) => f.write_str("StaticToken(<redacted>)"),
            Credentials::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Turn credentials into a bearer token.
///
/// A static token is returned unchanged without touching the network.
pub async fn resolve_token(base_url: &str, credentials: &Credentials) -> HarnessResult<String> {
    match credentials {
        Credentials::StaticToken(token) => {
            info!("Using pre-issued bearer token");
            Ok(token.clone())
        }
        Credentials::Login { email, password } => authenticate(base_url, email, password).await,
    }
}

/// POST the login body once and pull `accessToken` out of a 200 response.
///
/// There is no retry: every later case depends on this token, so a failed
/// attempt aborts the run.
pub async fn authenticate(base_url: &str, email: &str, password: &str) -> HarnessResult<String> {
    let url = endpoint(base_url, paths::AUTHENTICATION);
    info!("Authenticating as {} against {}", email, url);

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(&AuthRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .send()
        .await?;

    let status = resp.status();
    if status != StatusCode::OK {
        warn!("Login returned {}", status);
        return Err(HarnessError::AuthenticationFailed {
            status: status.as_u16(),
        });
    }

    let body = resp.text().await?;
    let parsed: AuthResponse = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Login body is not a token document: {}", e);
            return Err(HarnessError::TokenMissing);
        }
    };

    parsed
        .token()
        .map(str::to_string)
        .ok_or(HarnessError::TokenMissing)
}
