//! Outbound HTTP client layer for load balancer control-plane APIs.
//!
//! Builds a TLS-aware pooled transport from a [`SettingsSource`], and wraps
//! it in a [`RoundTripper`] that sets a fixed [`HeaderSet`] on every request.
//!
//! ```no_run
//! use lb_control_http::{build_request, EnvSettings, RoundTripper};
//! use hyper::Method;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let round_tripper = RoundTripper::from_settings(&EnvSettings::new())?;
//! let request = build_request(Method::GET, "https://lb.example.com/api/9/nginx", None)?;
//! let response = round_tripper.round_trip(request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod infra;

pub use client::{build_request, HeaderEntry, HeaderSet, RoundTripper};
pub use config::{Config, EnvSettings};
pub use error::{AppError, ConfigError, HeaderError, RequestError};
pub use infra::{
    build_tls_options, HyperTransport, RequestBody, ResponseBody, SettingsSource,
    StaticSettings, TlsOptions, TlsSettings, TlsVersion, Transport, TransportOptions,
};
