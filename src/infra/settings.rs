//! Settings source abstraction.
//!
//! TLS options are derived from a snapshot read through [`SettingsSource`],
//! which is handed to the builder explicitly rather than looked up globally.
//! Any backing store can implement it; [`StaticSettings`] serves fixed values.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum TLS protocol version accepted by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TlsVersion {
    #[default]
    #[serde(rename = "1.2")]
    Tls12,
    #[serde(rename = "1.3")]
    Tls13,
}

impl FromStr for TlsVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.trim_start_matches("tls").trim_start_matches('v') {
            "1.2" | "12" => Ok(TlsVersion::Tls12),
            "1.3" | "13" => Ok(TlsVersion::Tls13),
            _ => Err(ConfigError::InvalidValue {
                key: "min_version".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsVersion::Tls12 => f.write_str("TLSv1.2"),
            TlsVersion::Tls13 => f.write_str("TLSv1.3"),
        }
    }
}

/// Snapshot of the TLS-relevant settings at the time of the read.
///
/// Every field is optional; unset fields fall back to secure defaults when
/// the snapshot is turned into [`TlsOptions`](super::tls::TlsOptions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsSettings {
    /// Whether the server certificate chain is verified. Defaults to `true`.
    pub verify_peer: Option<bool>,
    /// Lowest protocol version offered. Defaults to TLS 1.2.
    pub min_version: Option<TlsVersion>,
    /// Additional trusted CA certificates, PEM encoded.
    pub ca_certificates_pem: Option<String>,
    /// Client certificate chain for mutual TLS, PEM encoded.
    pub client_certificate_pem: Option<String>,
    /// Private key matching `client_certificate_pem`, PEM encoded.
    pub client_key_pem: Option<String>,
}

/// Capability to read the current TLS settings.
///
/// Implementations must not cache on behalf of the caller: each call
/// returns the values current at that moment.
pub trait SettingsSource: Send + Sync {
    /// Returns the current settings snapshot, or a read error.
    fn tls_settings(&self) -> Result<TlsSettings, ConfigError>;
}

/// Settings source that always returns the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    settings: TlsSettings,
}

impl StaticSettings {
    /// Creates a source serving `settings` on every read.
    pub fn new(settings: TlsSettings) -> Self {
        Self { settings }
    }
}

impl SettingsSource for StaticSettings {
    fn tls_settings(&self) -> Result<TlsSettings, ConfigError> {
        Ok(self.settings.clone())
    }
}
