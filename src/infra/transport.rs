//! Request-executing transport.
//!
//! [`Transport`] is the seam the round tripper delegates to. [`HyperTransport`]
//! is the production implementation: a pooled hyper-util client dialing
//! through [`HttpsConnector`].

use super::connector::HttpsConnector;
use super::tls::TlsOptions;
use crate::error::ConfigError;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Body type of outbound requests.
pub type RequestBody = Full<Bytes>;

/// Body type of inbound responses.
pub type ResponseBody = UnsyncBoxBody<Bytes, hyper::Error>;

/// Future returned by [`Transport::execute`].
pub type TransportFuture<'a, E> =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, E>> + Send + 'a>>;

/// Performs the network side of a round trip.
///
/// Implementations must be safe to call concurrently through `&self`.
pub trait Transport: Send + Sync {
    /// Error produced by a failed round trip.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `request` and resolves to the response head with a streaming body.
    fn execute(&self, request: Request<RequestBody>) -> TransportFuture<'_, Self::Error>;
}

/// Connection pool settings for [`HyperTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Limit on establishing a TCP connection. `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,
    /// How long an idle pooled connection is kept open.
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(10)),
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: usize::MAX,
        }
    }
}

/// Pooled HTTP/HTTPS transport backed by hyper-util.
///
/// Construction performs no I/O; connections are opened on first use and
/// reused across requests.
pub struct HyperTransport {
    client: Client<HttpsConnector, RequestBody>,
}

impl HyperTransport {
    /// Creates a transport with default pool settings.
    pub fn new(tls: &TlsOptions) -> Result<Self, ConfigError> {
        Self::with_options(tls, TransportOptions::default())
    }

    /// Creates a transport with explicit pool settings.
    pub fn with_options(tls: &TlsOptions, options: TransportOptions) -> Result<Self, ConfigError> {
        let mut http = HttpConnector::new();
        http.set_connect_timeout(options.connect_timeout);
        http.set_nodelay(true);

        let connector = HttpsConnector::new(http, tls.connector()?);

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(options.pool_idle_timeout)
            .pool_max_idle_per_host(options.pool_max_idle_per_host)
            .http1_title_case_headers(true)
            .build(connector);

        tracing::debug!(
            verify_peer = tls.verify_peer,
            min_version = %tls.min_version,
            extra_ca_certificates = tls.ca_certificates.len(),
            client_auth = tls.client_identity.is_some(),
            "Built HTTP transport"
        );

        Ok(Self { client })
    }
}

impl Transport for HyperTransport {
    type Error = hyper_util::client::legacy::Error;

    fn execute(&self, request: Request<RequestBody>) -> TransportFuture<'_, Self::Error> {
        let response = self.client.request(request);
        Box::pin(async move {
            response
                .await
                .map(|response| response.map(BodyExt::boxed_unsync))
        })
    }
}
