//! The authenticated session shared by every case in a run

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{HarnessError, HarnessResult};

/// Join a base endpoint and an absolute request path
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Status and raw body of one response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body into a typed record
    pub fn json<T: DeserializeOwned>(&self) -> HarnessResult<T> {
        serde_json::from_str(&self.body).map_err(HarnessError::from)
    }
}

/// One bearer-authenticated client bound to a base endpoint.
///
/// Built once during setup and borrowed by each case; the token is never
/// re-acquired mid-run.
pub struct Session {
    client: reqwest::Client,
    base_url: String,
}

impl Session {
    /// Build the client that attaches `Authorization: Bearer <token>` to every request
    pub fn connect(base_url: &str, token: &str) -> HarnessResult<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| HarnessError::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        info!("Session established for {}", base_url);
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get(&self, path: &str) -> HarnessResult<ApiResponse> {
        self.send(self.client.get(endpoint(&self.base_url, path))).await
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> HarnessResult<ApiResponse> {
        self.send(self.client.post(endpoint(&self.base_url, path)).json(body))
            .await
    }

    pub async fn put_json<B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> HarnessResult<ApiResponse> {
        let req = self
            .client
            .put(endpoint(&self.base_url, path))
            .query(query)
            .json(body);
        self.send(req).await
    }

    pub async fn delete(&self, path: &str, query: &[(&str, &str)]) -> HarnessResult<ApiResponse> {
        let req = self
            .client
            .delete(endpoint(&self.base_url, path))
            .query(query);
        self.send(req).await
    }

    /// Issue exactly one request and buffer the body
    async fn send(&self, req: RequestBuilder) -> HarnessResult<ApiResponse> {
        let request = req.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!("{} {} -> {}", method, path, status);
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }

    /// Release the transport. Pooled connections close when the client drops.
    pub fn close(self) {
        info!("Releasing session for {}", self.base_url);
        drop(self.client);
    }
}
