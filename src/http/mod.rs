use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

use crate::config::{HttpConfig, ProxyConfig};

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_too_many_requests(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS.as_u16()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),
}

/// HTTP collaborator the retrieval pipeline talks through.
///
/// Responses come back for every status code; deciding what a status means is
/// left to the caller. Headers set through [`HttpTransport::set_header`] apply
/// to every later request on the same transport, so pipelines sharing one
/// transport also share consent cookies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError>;

    /// Set a default header sent with every subsequent request
    fn set_header(&self, name: &str, value: &str) -> Result<(), TransportError>;

    /// Current value of a default header
    fn header(&self, name: &str) -> Option<String>;
}

/// [`HttpTransport`] backed by a pooled reqwest client
pub struct ReqwestTransport {
    client: Client,
    headers: RwLock<HeaderMap>,
    retries_on_429: u32,
}

impl ReqwestTransport {
    pub fn new(
        http: &HttpConfig,
        proxy: Option<&ProxyConfig>,
        retries_on_429: u32,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(http.timeout_secs));

        if let Some(proxy) = proxy {
            let mut target = reqwest::Proxy::all(proxy.url())
                .map_err(|e| TransportError::InvalidProxy(e.to_string()))?;
            if let Some(auth) = &proxy.auth {
                target = target.basic_auth(&auth.username, &auth.password);
            }
            builder = builder.proxy(target);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, header_value("Accept-Language", &http.accept_language)?);

        if http.prevent_keeping_connections_alive {
            builder = builder.pool_max_idle_per_host(0);
            headers.insert(CONNECTION, HeaderValue::from_static("close"));
        }

        Ok(Self {
            client: builder.build()?,
            headers: RwLock::new(headers),
            retries_on_429,
        })
    }

    /// Send a request, re-sending it while the server answers 429 and budget remains
    async fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<HttpResponse, TransportError> {
        let mut attempt = 0;
        loop {
            let headers = self.headers.read().clone();
            let response = build().headers(headers).send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.retries_on_429 {
                attempt += 1;
                tracing::warn!(
                    "HTTP 429 from {}, retrying ({}/{})",
                    response.url(),
                    attempt,
                    self.retries_on_429
                );
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                continue;
            }

            let body = response.text().await?;
            return Ok(HttpResponse::new(status.as_u16(), body));
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.send(|| self.client.get(url)).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        self.send(|| self.client.post(url).json(body)).await
    }

    fn set_header(&self, name: &str, value: &str) -> Result<(), TransportError> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = header_value(name, value)?;
        self.headers.write().insert(header_name, header_value);
        Ok(())
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .read()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
