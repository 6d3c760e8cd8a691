use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Fetch attempts per tick: the initial request plus two retries.
pub const MAX_ATTEMPTS: u32 = 3;

/// Per-attempt request timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Response body size cap.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching one endpoint body.
///
/// Every variant counts as a failed attempt and is retried within the same
/// tick until [`MAX_ATTEMPTS`] is exhausted.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body was not valid UTF-8 text
    #[error("Response body is not text")]
    NonTextBody,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

/// Fetch one endpoint body, retrying failed attempts within the tick.
///
/// Up to [`MAX_ATTEMPTS`] attempts run back to back with no backoff, so a
/// bad tick finishes quickly and never shifts the next tick's schedule. On
/// success returns the response body; on exhaustion returns the last error.
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<String, FetchError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match fetch_once(client, endpoint).await {
            Ok(body) => {
                if attempt > 1 {
                    tracing::debug!(endpoint, attempt, "Fetch succeeded after retry");
                }
                return Ok(body);
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::debug!(endpoint, attempt, error = %e, "Fetch attempt failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

/// One GET attempt: send, validate status, read the size-capped body.
async fn fetch_once(client: &reqwest::Client, endpoint: &str) -> Result<String, FetchError> {
    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(endpoint).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    read_limited_text(response, MAX_BODY_SIZE).await
}

async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, FetchError> {
    // Fast path: check Content-Length header before downloading anything
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| FetchError::NonTextBody)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{any, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello\nworld\n"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let body = fetch_with_retry(&client, &mock_server.uri()).await.unwrap();
        assert_eq!(body, "hello\nworld\n");
    }

    #[tokio::test]
    async fn test_non_2xx_retried_then_surfaced() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(MAX_ATTEMPTS as u64)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_with_retry(&client, &mock_server.uri())
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus(404) => {}
            e => panic!("Expected HttpStatus(404), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_fail_twice_then_succeed_yields_one_body() {
        let mock_server = MockServer::start().await;

        // First two requests return 503, third succeeds
        Mock::given(any())
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_string("https://www.ok.com\n"))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let body = fetch_with_retry(&client, &mock_server.uri()).await.unwrap();
        assert_eq!(body, "https://www.ok.com\n");
    }

    #[tokio::test]
    async fn test_all_attempts_fail_returns_error_without_panic() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(MAX_ATTEMPTS as u64)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_with_retry(&client, &mock_server.uri())
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus(500) => {}
            e => panic!("Expected HttpStatus(500), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on this port; connect fails on every attempt.
        let client = reqwest::Client::new();
        let err = fetch_with_retry(&client, "http://127.0.0.1:1/page")
            .await
            .unwrap_err();
        match err {
            FetchError::Network(_) => {}
            e => panic!("Expected Network error, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_non_utf8_body_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0xfd]))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_with_retry(&client, &mock_server.uri())
            .await
            .unwrap_err();
        match err {
            FetchError::NonTextBody => {}
            e => panic!("Expected NonTextBody, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mock_server = MockServer::start().await;
        // Content-Length over the cap trips the fast path before download
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'a'; MAX_BODY_SIZE + 1]))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_with_retry(&client, &mock_server.uri())
            .await
            .unwrap_err();
        match err {
            FetchError::ResponseTooLarge => {}
            e => panic!("Expected ResponseTooLarge, got {:?}", e),
        }
    }
}
