//! Remote analysis backend client
//!
//! Posts the query to `{base_url}/analyze/` and decodes the analysis payload.
//! Transport policy is deliberately thin: the reqwest defaults apply, there
//! are no retries, and a response is accepted wholesale or not at all.

use async_trait::async_trait;

use crate::error::WebServerResult;
use crate::traits::AnalysisBackend;
use shared::{AnalysisRequest, AnalysisResponse, BackendFailure};

/// Real backend client over a shared reqwest connection pool
#[derive(Clone)]
pub struct RealAnalysisBackend {
    client: reqwest::Client,
    base_url: String,
}

impl RealAnalysisBackend {
    /// `base_url` is taken as configured; trailing slashes are trimmed so the
    /// endpoint path joins cleanly.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/analyze/", self.base_url)
    }
}

#[async_trait]
impl AnalysisBackend for RealAnalysisBackend {
    async fn analyze(&self, query: &str) -> WebServerResult<AnalysisResponse> {
        let request = AnalysisRequest {
            query: query.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendFailure::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the backend's own {"error": …} body over the bare status
            let message = match response.json::<serde_json::Value>().await {
                Ok(body) => body
                    .get("error")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
                Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
            };

            return Err(BackendFailure::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let payload = response
            .json::<AnalysisResponse>()
            .await
            .map_err(|e| BackendFailure::Decode(e.to_string()))?;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed_from_base_url() {
        let backend = RealAnalysisBackend::new(reqwest::Client::new(), "http://localhost:9000/api//");

        assert_eq!(backend.base_url(), "http://localhost:9000/api");
        assert_eq!(backend.endpoint(), "http://localhost:9000/api/analyze/");
    }
}
