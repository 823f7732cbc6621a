//! HTTP backend abstraction for the evaluation service.
//!
//! The client talks to a [`HttpBackend`] so that request building and
//! response mapping can be tested without a server. The production backend
//! uses reqwest; idempotent `GET`s are retried with exponential backoff,
//! uploads are sent exactly once.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::{HttpError, HttpResult};
use crate::models::error_message;

// ============================================================================
// Upload Form
// ============================================================================

/// A multipart upload: text fields plus one binary file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub fields: Vec<(&'static str, String)>,
    pub file: FilePart,
}

impl UploadForm {
    /// Value of a text field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The binary part of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: &'static str,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that exchange JSON with the service.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> HttpResult<T>;

    /// Post a multipart form and deserialize the JSON answer. Never retried.
    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        form: UploadForm,
    ) -> HttpResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &ApiClientConfig) -> HttpResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(&self, url: &Url) -> HttpResult<reqwest::Response> {
        let mut attempt: u8 = 0;
        loop {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(u32::from(attempt) - 1);
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    // 5xx errors are retryable (server-side issues)
                    if response.status().is_server_error() && attempt < self.max_retries {
                        tracing::warn!(
                            %url,
                            status = response.status().as_u16(),
                            attempt,
                            "Server error, retrying"
                        );
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) if attempt < self.max_retries => {
                    tracing::warn!(%url, error = %e, attempt, "Request failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Read a response, turning non-success statuses into [`HttpError::Status`].
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> HttpResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(HttpError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

fn to_multipart(form: UploadForm) -> HttpResult<reqwest::multipart::Form> {
    let part = reqwest::multipart::Part::bytes(form.file.bytes.to_vec())
        .file_name(form.file.file_name)
        .mime_str(&form.file.content_type)?;

    let mut multipart = reqwest::multipart::Form::new();
    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }
    Ok(multipart.part(form.file.name, part))
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> HttpResult<T> {
        tracing::debug!(%url, "GET");
        let response = self.fetch_with_retry(url).await?;
        read_json(response).await
    }

    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        form: UploadForm,
    ) -> HttpResult<T> {
        tracing::debug!(%url, bytes = form.file.bytes.len(), "POST multipart");
        let multipart = to_multipart(form)?;
        let response = self
            .client
            .post(url.as_str())
            .multipart(multipart)
            .send()
            .await?;
        read_json(response).await
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Canned answer for one URL pattern.
    #[derive(Clone)]
    pub enum CannedResponse {
        Json(serde_json::Value),
        Status { status: u16, body: String },
    }

    /// A fake HTTP backend that returns canned responses and records requests.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Vec<(String, CannedResponse)>,
        pub gets: Mutex<Vec<Url>>,
        pub posts: Mutex<Vec<(Url, UploadForm)>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for URLs containing `pattern`.
        pub fn with_response(mut self, pattern: &str, response: CannedResponse) -> Self {
            self.responses.push((pattern.to_string(), response));
            self
        }

        fn answer<T: DeserializeOwned>(&self, url: &Url) -> HttpResult<T> {
            let canned = self
                .responses
                .iter()
                .find(|(pattern, _)| url.as_str().contains(pattern.as_str()))
                .map(|(_, response)| response.clone());

            match canned {
                Some(CannedResponse::Json(json)) => Ok(serde_json::from_value(json)?),
                Some(CannedResponse::Status { status, body }) => Err(HttpError::Status {
                    status,
                    message: error_message(&body),
                }),
                None => Err(HttpError::Status {
                    status: 404,
                    message: None,
                }),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> HttpResult<T> {
            self.gets.lock().unwrap().push(url.clone());
            self.answer(url)
        }

        async fn post_form<T: DeserializeOwned + Send>(
            &self,
            url: &Url,
            form: UploadForm,
        ) -> HttpResult<T> {
            self.posts.lock().unwrap().push((url.clone(), form));
            self.answer(url)
        }
    }
}
