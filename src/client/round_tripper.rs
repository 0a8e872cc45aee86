//! Header-injecting round tripper.
//!
//! A [`RoundTripper`] owns a [`Transport`] and shares a read-only
//! [`HeaderSet`]. Every request it executes first has the header set applied,
//! then goes to the transport; whatever the transport returns is handed back
//! untouched.

use super::headers::HeaderSet;
use crate::error::ConfigError;
use crate::infra::{
    build_tls_options, HyperTransport, RequestBody, ResponseBody, SettingsSource, Transport,
};
use hyper::{Request, Response};
use std::sync::Arc;

/// Executes requests through a transport with a fixed set of headers.
///
/// The managed headers always win: if the caller already set `Content-Type`
/// or `Accept` (or any other name in the header set), those values are
/// replaced before the request is sent.
///
/// Not `Clone`. Wrap it in an [`Arc`] to share it between tasks; `round_trip`
/// only needs `&self` and concurrent calls are independent.
pub struct RoundTripper<T = HyperTransport> {
    headers: Arc<HeaderSet>,
    transport: T,
}

impl RoundTripper<HyperTransport> {
    /// Builds a round tripper with the JSON headers and a transport configured
    /// from the current TLS settings in `settings`.
    pub fn from_settings<S>(settings: &S) -> Result<Self, ConfigError>
    where
        S: SettingsSource + ?Sized,
    {
        let tls = build_tls_options(settings)?;
        let transport = HyperTransport::new(&tls)?;
        Ok(Self::new(Arc::new(HeaderSet::json()), transport))
    }
}

impl<T: Transport> RoundTripper<T> {
    pub fn new(headers: Arc<HeaderSet>, transport: T) -> Self {
        Self { headers, transport }
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Applies the header set to `request` without sending it.
    pub fn prepare(&self, request: &mut Request<RequestBody>) {
        self.headers.apply(request.headers_mut());
    }

    /// Applies the header set to `request` and executes it.
    ///
    /// Transport errors are returned as-is. Nothing is retried; dropping the
    /// returned future cancels the request.
    pub async fn round_trip(
        &self,
        mut request: Request<RequestBody>,
    ) -> Result<Response<ResponseBody>, T::Error> {
        self.prepare(&mut request);

        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            "Executing request"
        );

        let response = self.transport.execute(request).await?;

        tracing::debug!(status = %response.status(), "Received response");
        Ok(response)
    }
}
