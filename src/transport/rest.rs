use reqwest::{Client, Response, header::HeaderValue};
use crate::error::{ApiErrorEnvelope, Error, Result};
use crate::protocol::models::{GenerateContentRequest, GenerateContentResponse};
use std::time::Duration;

pub const REST_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// An adapter for the one-shot `generateContent` REST endpoint.
#[derive(Clone, Debug)]
pub struct RestAdapter {
    client: Client,
    api_key: HeaderValue,
    base_url: String,
}

impl RestAdapter {
    /// Create a new adapter with the given API key.
    ///
    /// # Errors
    /// Returns an error if the API key results in an invalid header or client build fails.
    #[allow(clippy::result_large_err)]
    pub fn new(api_key: &str) -> Result<Self> {
        Self::new_with_timeouts(api_key, REST_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_POOL_IDLE_TIMEOUT)
    }

    /// Create a new adapter against a custom base URL.
    ///
    /// # Errors
    /// Returns an error if the API key results in an invalid header or client build fails.
    #[allow(clippy::result_large_err)]
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        Self::new_with_timeouts(api_key, base_url, DEFAULT_TIMEOUT, DEFAULT_POOL_IDLE_TIMEOUT)
    }

    /// Create a new adapter against a custom base URL with custom timeouts.
    ///
    /// # Errors
    /// Returns an error if the API key results in an invalid header or client build fails.
    #[allow(clippy::result_large_err)]
    pub fn new_with_timeouts(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
        pool_idle_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(pool_idle_timeout)
            .build()?;

        let mut api_key = HeaderValue::from_str(api_key)?;
        api_key.set_sensitive(true);

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a single completion request.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or the API reports an error.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let model = model.trim_start_matches("models/");
        let url = format!("{}/models/{model}:generateContent", self.base_url);

        let res = self.client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        Ok(check_status(res).await?.json().await?)
    }

    /// Run a completion and return its text.
    ///
    /// # Errors
    /// Returns [`Error::EmptyResponse`] when the first candidate carries no text.
    pub async fn generate_text(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String> {
        self.generate_content(model, request)
            .await?
            .text()
            .ok_or(Error::EmptyResponse)
    }
}

async fn check_status(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await?;
    match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => Err(Error::Api(envelope.error)),
        Err(_) => Err(Error::Api(crate::error::ApiError {
            code: status.as_u16(),
            message: body,
            status: status.canonical_reason().map(str::to_owned),
        })),
    }
}
