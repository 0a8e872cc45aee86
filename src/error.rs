use thiserror::Error;

/// Errors raised while reading settings or turning them into TLS configuration.
///
/// These are construction-time failures: they abort client setup and never
/// surface from an individual round trip.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    SettingsRead(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Client certificate and client key must be configured together")]
    IncompleteClientIdentity,

    #[error("TLS configuration rejected: {0}")]
    Tls(#[from] rustls::Error),
}

/// Errors raised while building a header entry.
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Malformed header line: {0:?}")]
    Malformed(String),

    #[error("Invalid header name: {0}")]
    InvalidName(#[from] hyper::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidValue(#[from] hyper::header::InvalidHeaderValue),
}

/// Errors raised while building an outbound request.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build request: {0}")]
    Build(#[from] hyper::http::Error),
}

/// Top-level error for the probe binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("Failed to read body: {0}")]
    Body(#[from] hyper::Error),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl AppError {
    /// Short machine-readable code, used as the process log tag.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Request(_) => "INVALID_REQUEST",
            AppError::Transport(e) => {
                if e.is_connect() {
                    "CONNECTION_FAILED"
                } else {
                    "REQUEST_FAILED"
                }
            }
            AppError::Body(_) => "BODY_READ_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
        }
    }
}
