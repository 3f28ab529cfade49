use crate::http::middleware::REQUEST_ID_HEADER;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderName, HeaderValue, Method};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use url::Url;

#[derive(Debug, Error)]
#[error("invalid CORS origin `{0}`, expected something like `https://example.com`")]
pub struct InvalidOriginError(pub String);

pub fn layer(allowed_origins: &[String]) -> Result<CorsLayer, InvalidOriginError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| parse_origin(origin))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_headers([CONTENT_TYPE])
        // The browser needs these to name the downloaded file and to report issues.
        .expose_headers([CONTENT_DISPOSITION, HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]))
}

/// `https://example.com/` -> `https://example.com`. Only http(s) origins with a host pass.
pub fn parse_origin(origin: &str) -> Result<HeaderValue, InvalidOriginError> {
    let invalid = || InvalidOriginError(origin.to_string());
    let url = Url::parse(origin.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(invalid());
    }
    HeaderValue::from_str(&url.origin().ascii_serialization()).map_err(|_| invalid())
}
