use crate::error::RequestError;
use crate::infra::RequestBody;
use hyper::body::Bytes;
use hyper::{Method, Request};

/// Builds an outbound request for `url`.
///
/// The URL must be absolute with an `http` or `https` scheme and a host,
/// since the pooled transport dials from the URI alone. A missing body is
/// sent as an empty one.
pub fn build_request(
    method: Method,
    url: &str,
    body: Option<Bytes>,
) -> Result<Request<RequestBody>, RequestError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| RequestError::InvalidUrl(format!("{}: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(RequestError::InvalidUrl(format!(
            "unsupported scheme {:?}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(RequestError::InvalidUrl("URL has no host".to_string()));
    }

    let request = Request::builder()
        .method(method)
        .uri(parsed.as_str())
        .body(RequestBody::new(body.unwrap_or_default()))?;

    Ok(request)
}
