//! TLS/SSL infrastructure.
//!
//! Turns a settings snapshot into immutable [`TlsOptions`], and those options
//! into a rustls client configuration for the transport.

use super::settings::{SettingsSource, TlsSettings, TlsVersion};
use crate::error::ConfigError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::version::{TLS12, TLS13};
use rustls::{
    ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme, SupportedProtocolVersion,
};
use rustls_pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use std::sync::Arc;
use tokio_rustls::TlsConnector;

static TLS12_AND_UP: &[&SupportedProtocolVersion] = &[&TLS13, &TLS12];
static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&TLS13];

impl TlsVersion {
    fn protocol_versions(self) -> &'static [&'static SupportedProtocolVersion] {
        match self {
            TlsVersion::Tls12 => TLS12_AND_UP,
            TlsVersion::Tls13 => TLS13_ONLY,
        }
    }
}

/// Certificate chain and private key presented for mutual TLS.
#[derive(Debug)]
pub struct ClientIdentity {
    pub cert_chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

/// Immutable TLS behavior for a transport.
///
/// Built fresh from the current settings on every call to
/// [`build_tls_options`]; nothing is cached between builds.
#[derive(Debug)]
pub struct TlsOptions {
    pub verify_peer: bool,
    pub min_version: TlsVersion,
    /// Trusted in addition to the Mozilla root set.
    pub ca_certificates: Vec<CertificateDer<'static>>,
    pub client_identity: Option<ClientIdentity>,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            verify_peer: true,
            min_version: TlsVersion::default(),
            ca_certificates: Vec::new(),
            client_identity: None,
        }
    }
}

/// Reads the current settings from `source` and builds TLS options from them.
///
/// Absent settings are not an error; they produce the defaults (peer
/// verification on, TLS 1.2 minimum). Only a failed read or unusable
/// certificate material fails the build.
pub fn build_tls_options<S>(source: &S) -> Result<TlsOptions, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    let settings = source.tls_settings()?;
    TlsOptions::from_settings(&settings)
}

impl TlsOptions {
    /// Builds options from an already-read settings snapshot.
    pub fn from_settings(settings: &TlsSettings) -> Result<Self, ConfigError> {
        let ca_certificates = match non_empty(&settings.ca_certificates_pem) {
            Some(pem) => parse_certificates(pem)?,
            None => Vec::new(),
        };

        let client_identity = match (
            non_empty(&settings.client_certificate_pem),
            non_empty(&settings.client_key_pem),
        ) {
            (Some(cert_pem), Some(key_pem)) => Some(ClientIdentity {
                cert_chain: parse_certificates(cert_pem)?,
                key: parse_private_key(key_pem)?,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteClientIdentity),
        };

        Ok(Self {
            verify_peer: settings.verify_peer.unwrap_or(true),
            min_version: settings.min_version.unwrap_or_default(),
            ca_certificates,
            client_identity,
        })
    }

    /// Creates the rustls client configuration described by these options.
    ///
    /// Uses the ring provider explicitly, so no process-wide default crypto
    /// provider needs to be installed.
    pub fn client_config(&self) -> Result<Arc<ClientConfig>, ConfigError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_protocol_versions(self.min_version.protocol_versions())?;

        let builder = if self.verify_peer {
            builder.with_root_certificates(self.root_store()?)
        } else {
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert::new(provider)))
        };

        let config = match &self.client_identity {
            Some(identity) => builder
                .with_client_auth_cert(identity.cert_chain.clone(), identity.key.clone_key())?,
            None => builder.with_no_client_auth(),
        };

        Ok(Arc::new(config))
    }

    /// Creates a TLS connector from this configuration.
    pub fn connector(&self) -> Result<TlsConnector, ConfigError> {
        Ok(TlsConnector::from(self.client_config()?))
    }

    fn root_store(&self) -> Result<RootCertStore, ConfigError> {
        let mut root_store =
            RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        for cert in &self.ca_certificates {
            root_store
                .add(cert.clone())
                .map_err(|e| ConfigError::InvalidCertificate(e.to_string()))?;
        }

        Ok(root_store)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_certificates(pem: &str) -> Result<Vec<CertificateDer<'static>>, ConfigError> {
    let certs = rustls_pemfile::certs(&mut pem.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::InvalidCertificate(e.to_string()))?;

    if certs.is_empty() {
        return Err(ConfigError::InvalidCertificate(
            "no PEM certificate found".to_string(),
        ));
    }

    Ok(certs)
}

fn parse_private_key(pem: &str) -> Result<PrivateKeyDer<'static>, ConfigError> {
    rustls_pemfile::private_key(&mut pem.as_bytes())
        .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?
        .ok_or_else(|| ConfigError::InvalidPrivateKey("no PEM private key found".to_string()))
}

/// Server certificate verifier used when peer verification is disabled.
///
/// Accepts any certificate chain and server name. Handshake signatures are
/// still checked so the session keys belong to the presented certificate.
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl AcceptAnyServerCert {
    fn new(provider: Arc<CryptoProvider>) -> Self {
        Self { provider }
    }
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
