use crate::error::ConfigError;
use crate::infra::{SettingsSource, TlsSettings, TlsVersion, TransportOptions};
use std::{env, fs, time::Duration};

pub const CONTROL_PLANE_URL: &str = "CONTROL_PLANE_URL";
pub const REQUEST_TIMEOUT_MS: &str = "REQUEST_TIMEOUT_MS";
pub const CONNECT_TIMEOUT_MS: &str = "CONNECT_TIMEOUT_MS";

pub const TLS_VERIFY_PEER: &str = "TLS_VERIFY_PEER";
pub const TLS_MIN_VERSION: &str = "TLS_MIN_VERSION";
pub const TLS_CA_CERT_FILE: &str = "TLS_CA_CERT_FILE";
pub const TLS_CLIENT_CERT_FILE: &str = "TLS_CLIENT_CERT_FILE";
pub const TLS_CLIENT_KEY_FILE: &str = "TLS_CLIENT_KEY_FILE";

const DEFAULT_CONTROL_PLANE_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Process settings for the probe binary.
pub struct Config {
    pub control_plane_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`; unset or unparsable values use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            control_plane_url: lookup(CONTROL_PLANE_URL)
                .unwrap_or_else(|| DEFAULT_CONTROL_PLANE_URL.to_string()),
            request_timeout: Duration::from_millis(millis(
                REQUEST_TIMEOUT_MS,
                DEFAULT_REQUEST_TIMEOUT_MS,
            )),
            connect_timeout: Duration::from_millis(millis(
                CONNECT_TIMEOUT_MS,
                DEFAULT_CONNECT_TIMEOUT_MS,
            )),
        }
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Some(self.connect_timeout),
            ..Default::default()
        }
    }
}

/// TLS settings read from environment variables.
///
/// Certificate material is given as file paths, which are read on every
/// [`tls_settings`](SettingsSource::tls_settings) call so rotated files are
/// picked up by the next build.
pub struct EnvSettings {
    lookup: Box<Lookup>,
}

impl EnvSettings {
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads variables through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn read_file(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let Some(path) = self.var(key) else {
            return Ok(None);
        };

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ConfigError::SettingsRead(format!("{} ({}): {}", key, path, e)))
    }
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for EnvSettings {
    fn tls_settings(&self) -> Result<TlsSettings, ConfigError> {
        let verify_peer = self
            .var(TLS_VERIFY_PEER)
            .map(|v| parse_bool(TLS_VERIFY_PEER, &v))
            .transpose()?;

        let min_version = self
            .var(TLS_MIN_VERSION)
            .map(|v| {
                v.parse::<TlsVersion>()
                    .map_err(|_| invalid_value(TLS_MIN_VERSION, &v))
            })
            .transpose()?;

        Ok(TlsSettings {
            verify_peer,
            min_version,
            ca_certificates_pem: self.read_file(TLS_CA_CERT_FILE)?,
            client_certificate_pem: self.read_file(TLS_CLIENT_CERT_FILE)?,
            client_key_pem: self.read_file(TLS_CLIENT_KEY_FILE)?,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid_value(key, value)),
    }
}

fn invalid_value(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
