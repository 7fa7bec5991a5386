use std::time::Duration;

use dash_logging::{dash_debug, dash_warn, Redacted};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use shortdash_core::{AuthVerdict, PasswordDigest, ShortenRequest, ShortenedUrl, StatsPayload};

use crate::wire;
use crate::{ClientError, FailureKind};

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the backend; may carry a path prefix.
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Off by default: a slow backend is not a failure.
    pub request_timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The four backend operations the dashboard depends on.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn verify_credentials(
        &self,
        username: &str,
        digest: &PasswordDigest,
    ) -> Result<AuthVerdict, ClientError>;

    async fn list_urls(&self) -> Result<Vec<ShortenedUrl>, ClientError>;

    /// Returns the short link for the submitted URL.
    async fn shorten(&self, request: &ShortenRequest) -> Result<String, ClientError>;

    async fn fetch_stats(&self, hash: &str) -> Result<StatsPayload, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        if settings.base_url.cannot_be_a_base() {
            return Err(ClientError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::new(FailureKind::InvalidUrl, "base url cannot take a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, ClientError> {
        dash_debug!("GET {}", url);
        self.execute(self.client.get(url.clone()).header(ACCEPT, JSON), &url)
            .await
    }

    async fn post_json(&self, url: Url, body: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        dash_debug!("POST {} ({} bytes)", url, body.len());
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(body);
        self.execute(request, &url).await
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<Vec<u8>, ClientError> {
        let response = request.send().await.map_err(|err| {
            let err = map_reqwest_error(err);
            dash_warn!("{} failed: {}", url.path(), err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            dash_warn!("{} answered {}", url.path(), status);
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn verify_credentials(
        &self,
        username: &str,
        digest: &PasswordDigest,
    ) -> Result<AuthVerdict, ClientError> {
        dash_debug!("verifying credentials for user={}", Redacted(username));
        let url = self.endpoint(&["authUser"])?;
        let body = wire::encode_auth_request(username, digest)?;
        let response = self.post_json(url, body).await?;
        wire::decode_auth(&response)
    }

    async fn list_urls(&self) -> Result<Vec<ShortenedUrl>, ClientError> {
        let url = self.endpoint(&["urls"])?;
        let response = self.get(url).await?;
        wire::decode_urls(&response)
    }

    async fn shorten(&self, request: &ShortenRequest) -> Result<String, ClientError> {
        let url = self.endpoint(&["shorten"])?;
        let body = wire::encode_shorten_request(request)?;
        let response = self.post_json(url, body).await?;
        wire::decode_shorten(&response)
    }

    async fn fetch_stats(&self, hash: &str) -> Result<StatsPayload, ClientError> {
        if hash.is_empty() {
            return Err(ClientError::new(FailureKind::InvalidUrl, "empty hash"));
        }
        let url = self.endpoint(&["stats", hash])?;
        let response = self.get(url).await?;
        wire::decode_stats(&response)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::decode(err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
