use thiserror::Error;
use url::Url;

/// Errors that can occur during endpoint URL validation.
#[derive(Error, Debug)]
pub enum EndpointUrlError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a URL string for use as a polling endpoint.
///
/// Endpoints are operator-supplied, so this is a sanity check rather than a
/// trust boundary: the URL must parse, use http or https, and name a host.
/// Loopback and private addresses are deliberately allowed — polling a
/// service on the local network is a normal use of this tool.
///
/// # Examples
///
/// ```
/// use linklog::util::validate_endpoint;
///
/// let url = validate_endpoint("https://www.example.com").unwrap();
/// assert_eq!(url.host_str(), Some("www.example.com"));
///
/// // Rejects non-HTTP schemes
/// assert!(validate_endpoint("file:///etc/passwd").is_err());
/// ```
pub fn validate_endpoint(url_str: &str) -> Result<Url, EndpointUrlError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(EndpointUrlError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().is_none() {
        return Err(EndpointUrlError::MissingHost);
    }

    Ok(url)
}
