use http_body_util::BodyExt;
use hyper::Method;
use lb_control_http::{
    build_request, build_tls_options, AppError, Config, EnvSettings, HeaderSet, HyperTransport,
    RoundTripper,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::time::timeout;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lb_control_http=debug,lb_control_probe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    match probe(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "Probe failed");
            ExitCode::FAILURE
        }
    }
}

/// Sends one GET to the control plane and reports what came back.
async fn probe(config: &Config) -> Result<(), AppError> {
    let tls = build_tls_options(&EnvSettings::new())?;
    let transport = HyperTransport::with_options(&tls, config.transport_options())?;
    let round_tripper = RoundTripper::new(Arc::new(HeaderSet::json()), transport);

    tracing::info!(url = %config.control_plane_url, "Probing control plane");

    let request = build_request(Method::GET, &config.control_plane_url, None)?;

    let response = timeout(config.request_timeout, round_tripper.round_trip(request))
        .await
        .map_err(|_| AppError::Timeout(format!("{}ms", config.request_timeout.as_millis())))??;

    let status = response.status();
    let header_count = response.headers().len();

    let body = timeout(config.request_timeout, response.into_body().collect())
        .await
        .map_err(|_| AppError::Timeout("body read".to_string()))??
        .to_bytes();

    tracing::info!(
        status = %status,
        headers = header_count,
        body_bytes = body.len(),
        "Control plane responded"
    );

    Ok(())
}
