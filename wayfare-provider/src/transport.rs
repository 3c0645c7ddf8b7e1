use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use wayfare_core::provider::ProviderError;

/// Shared HTTP plumbing for the two provider gateways. Timeout handling is
/// the transport's job; callers only see `ProviderError`.
pub(crate) struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::decode(response).await
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::decode(response).await
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_ms)
        } else {
            ProviderError::Network(err.to_string())
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
