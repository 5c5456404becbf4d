//! HTTP transport seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every server interaction is a form-encoded POST (session probes and
//! sign-out post empty bodies). The trait keeps flow logic independent
//! of the HTTP stack so tests can script responses; `HttpTransport` is
//! the real reqwest-backed implementation.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use async_trait::async_trait;

/// Compatibility header asserted on every request.
pub const VERSION_HEADER: &str = "Tidepool-Version";
/// Current client API version.
pub const VERSION_HEADER_VALUE: &str = "1";
/// Per-request timeout. A timeout is a transport failure and maps
/// through the generic error path.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A completed HTTP exchange: status plus raw body. Interpreting the
/// body (JSON descriptor, error message, HTML page) is the caller's
/// job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never completed: connection failure or timeout. The
/// message is surfaced verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
}

/// Object-safe HTTP seam used by the auth client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `fields` form-encoded to `path` (relative to the deployment
    /// base). An empty `fields` slice posts an empty form body.
    async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<TransportResponse, TransportFailure>;
}

/// reqwest-backed transport: base URL, cookie store (the session cookie
/// set by sign-in must ride along on later calls), fixed per-request
/// timeout, and the version header on every call.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport rooted at `base_url` (trailing slash
    /// tolerated).
    ///
    /// # Errors
    ///
    /// Returns a [`TransportFailure`] when the underlying client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportFailure> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .build()
            .map_err(|e| TransportFailure { message: e.to_string() })?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { base_url, client })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<TransportResponse, TransportFailure> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(VERSION_HEADER, VERSION_HEADER_VALUE)
            .form(fields)
            .send()
            .await
            .map_err(|e| TransportFailure { message: e.to_string() })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure { message: e.to_string() })?;
        Ok(TransportResponse { status, body })
    }
}
