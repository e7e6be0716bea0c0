//! Reservation API client implementation

use crate::loading::LoadingIndicator;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tripsync_core::environment::ReservationApi;
use tripsync_core::error::ApiError;
use tripsync_core::ticket::{Credentials, Registration, Ticket, TicketId, TicketPayload};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Errors raised while building an [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// The base URL does not parse or cannot carry path segments
    #[error("Invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// Rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the reservation API.
///
/// Cheap to clone; clones share the connection pool and the loading indicator.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
    loading: LoadingIndicator,
}

impl ApiClient {
    /// Create a client for `base_url` with the given per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::InvalidBaseUrl`] if the URL cannot be used
    /// as a base for API paths.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientBuildError> {
        let invalid = |reason: String| ClientBuildError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_string()));
        }

        Ok(Self {
            client: Client::builder().build()?,
            base_url: parsed,
            timeout,
            loading: LoadingIndicator::new(),
        })
    }

    /// Share an existing indicator, e.g. one the UI already observes
    #[must_use]
    pub fn with_loading_indicator(mut self, loading: LoadingIndicator) -> Self {
        self.loading = loading;
        self
    }

    /// Indicator that is active while any call of this client is in flight
    #[must_use]
    pub const fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// Configured per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds `<base>/<segments...>`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send one request and return the raw success body.
    ///
    /// The whole exchange (connect, send, body read) runs under the timeout.
    /// The loading indicator stays active until this returns.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Timeout`] if the timeout elapsed (the call is dropped)
    /// - [`ApiError::Network`] if the server could not be reached
    /// - [`ApiError::Http`] for non-2xx statuses
    #[tracing::instrument(name = "api_request", skip(self, body), fields(status = tracing::field::Empty, elapsed_ms = tracing::field::Empty))]
    pub async fn request<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<String, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let _loading = self.loading.begin();
        let started = Instant::now();

        let mut builder = self
            .client
            .request(method, self.url(segments))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status();
            let text = response.text().await.map_err(transport_error)?;
            Ok::<(StatusCode, String), ApiError>((status, text))
        };

        let outcome = tokio::time::timeout(self.timeout, exchange).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::Span::current().record("elapsed_ms", elapsed_ms);

        let Ok(result) = outcome else {
            tracing::warn!(timeout_ms = ?self.timeout.as_millis(), "Request timed out");
            return Err(ApiError::Timeout);
        };
        let (status, text) = result.inspect_err(|e| tracing::warn!(error = %e, "Request failed"))?;
        tracing::Span::current().record("status", status.as_u16());

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Server rejected request");
            return Err(ApiError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                &text,
            ));
        }

        Ok(text)
    }

    async fn send_json<B>(&self, method: Method, segments: &[&str], body: &B) -> Result<String, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.request(method, segments, Some(body)).await
    }

    async fn send_empty(&self, method: Method, segments: &[&str]) -> Result<String, ApiError> {
        self.request::<()>(method, segments, None).await
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(error.to_string())
    }
}

/// Interprets a create/update body: a ticket when the server echoed one,
/// `None` for an opaque acknowledgement.
fn optional_ticket(body: &str) -> Option<Ticket> {
    let ticket = serde_json::from_str::<Ticket>(body).ok();
    if ticket.is_none() && !body.trim().is_empty() {
        tracing::debug!("Treating non-ticket response as acknowledgement");
    }
    ticket
}

impl ReservationApi for ApiClient {
    fn register(&self, registration: &Registration) -> impl Future<Output = Result<(), ApiError>> + Send {
        async move {
            self.send_json(Method::POST, &["auth", "register"], registration)
                .await
                .map(drop)
        }
    }

    fn login(&self, credentials: &Credentials) -> impl Future<Output = Result<(), ApiError>> + Send {
        async move {
            self.send_json(Method::POST, &["auth", "login"], credentials)
                .await
                .map(drop)
        }
    }

    fn create_ticket(
        &self,
        payload: &TicketPayload,
    ) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send {
        async move {
            let body = self.send_json(Method::POST, &["tickets"], payload).await?;
            Ok(optional_ticket(&body))
        }
    }

    fn update_ticket(
        &self,
        id: &TicketId,
        payload: &TicketPayload,
    ) -> impl Future<Output = Result<Option<Ticket>, ApiError>> + Send {
        async move {
            let body = self
                .send_json(Method::PUT, &["tickets", id.as_str()], payload)
                .await?;
            Ok(optional_ticket(&body))
        }
    }

    fn list_tickets(&self, username: &str) -> impl Future<Output = Result<Vec<Ticket>, ApiError>> + Send {
        async move {
            let body = self
                .send_empty(Method::GET, &["tickets", "user", username])
                .await?;
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
        }
    }

    fn delete_ticket(&self, id: &TicketId) -> impl Future<Output = Result<(), ApiError>> + Send {
        async move {
            self.send_empty(Method::DELETE, &["tickets", id.as_str()])
                .await
                .map(drop)
        }
    }
}
