//! HTTP client helpers for tests.

use std::time::Duration;

use semgrade::gateway::{
    ErrorResponse, EvaluateRequest, EvaluateResponse, HealthResponse, ReadyResponse,
    STATUS_HEADER,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    fn status_header(resp: &reqwest::Response) -> String {
        resp.headers()
            .get(STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    }

    pub async fn evaluate(
        &self,
        reference: &str,
        candidate: &str,
    ) -> Result<(EvaluateResponse, String), TestClientError> {
        let request = EvaluateRequest {
            reference: reference.to_string(),
            candidate: candidate.to_string(),
        };
        let resp = self
            .client
            .post(self.url("/v1/evaluate"))
            .json(&request)
            .send()
            .await?;

        let status_header = Self::status_header(&resp);

        match resp.status().as_u16() {
            200 => Ok((resp.json().await?, status_header)),
            400 => Err(TestClientError::BadRequest(resp.json().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    /// Posts the HTML form; returns status code, status header and page body.
    pub async fn submit_form(
        &self,
        reference: &str,
        candidate: &str,
    ) -> Result<(u16, String, String), TestClientError> {
        let resp = self
            .client
            .post(self.url("/evaluate"))
            .form(&[("reference", reference), ("candidate", candidate)])
            .send()
            .await?;

        let status = resp.status().as_u16();
        let status_header = Self::status_header(&resp);
        Ok((status, status_header, resp.text().await?))
    }

    pub async fn index(&self) -> Result<String, TestClientError> {
        Ok(self.client.get(self.url("/")).send().await?.text().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        Ok(self.client.get(self.url("/healthz")).send().await?.json().await?)
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        Ok(self.client.get(self.url("/ready")).send().await?.json().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Bad request: {0:?}")]
    BadRequest(ErrorResponse),
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}
