//! Infrastructure layer providing abstractions for external dependencies.
//!
//! This module contains traits and implementations for:
//! - Reading TLS settings from a configuration store
//! - Building rustls client configuration from those settings
//! - Dialing plain and TLS connections
//! - Executing requests over a pooled transport
//!
//! The traits ([`SettingsSource`], [`Transport`]) are the injection points for
//! test doubles; nothing here reaches for global state.

pub mod connector;
pub mod settings;
pub mod tls;
pub mod transport;

pub use connector::{HttpsConnector, MaybeTlsStream};
pub use settings::{SettingsSource, StaticSettings, TlsSettings, TlsVersion};
pub use tls::{build_tls_options, ClientIdentity, TlsOptions};
pub use transport::{
    HyperTransport, RequestBody, ResponseBody, Transport, TransportFuture, TransportOptions,
};
