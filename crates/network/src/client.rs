// crates/network/src/client.rs
//! HTTP client wrapper shared by all source adapters
//!
//! Wraps `reqwest` with a per-request timeout, a project user agent, and the
//! one transport fallback the upstream catalogs need: some of them reject
//! cross-origin/direct requests, so a failed direct GET is retried exactly
//! once through a public relay endpoint. No further retries happen at this
//! layer.

use crate::error::{NetworkError, NetworkResult};
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default relay used when a direct request is rejected
pub const DEFAULT_RELAY: &str = "https://api.allorigins.win/raw?url=";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Relay prefix; the target URL is percent-encoded and appended
    pub relay_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("brewbooks/{}", env!("CARGO_PKG_VERSION")),
            relay_url: DEFAULT_RELAY.to_string(),
        }
    }
}

/// Async HTTP client used by every adapter
#[derive(Clone)]
pub struct HttpClient {
    inner: ReqwestClient,
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a client with default configuration
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: ClientConfig) -> NetworkResult<Self> {
        let inner = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(NetworkError::Http)?;

        Ok(Self { inner, config })
    }

    /// Performs a GET request and returns the body as text
    pub async fn get_text(&self, url: &str) -> NetworkResult<String> {
        let response = self.inner.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// Performs a GET request and decodes the body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> NetworkResult<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| NetworkError::Decode(e.to_string()))
    }

    /// GET with the single relay fallback: direct first, then one retry
    /// through the relay if the direct attempt failed at transport or with
    /// a non-2xx status.
    pub async fn get_text_with_relay(&self, url: &str) -> NetworkResult<String> {
        match self.get_text(url).await {
            Ok(body) => Ok(body),
            Err(e) if e.is_relay_eligible() => {
                log::warn!("direct fetch of {url} failed ({e}), retrying via relay");
                self.get_text(&self.relayed(url)).await
            }
            Err(e) => Err(e),
        }
    }

    /// JSON variant of [`Self::get_text_with_relay`]
    pub async fn get_json_with_relay<T: DeserializeOwned>(&self, url: &str) -> NetworkResult<T> {
        let body = self.get_text_with_relay(url).await?;
        serde_json::from_str(&body).map_err(|e| NetworkError::Decode(e.to_string()))
    }

    /// The relay form of a URL
    pub fn relayed(&self, url: &str) -> String {
        format!("{}{}", self.config.relay_url, urlencoding::encode(url))
    }
}

/// Percent-encoding for query-string values. Everything outside the RFC 3986
/// unreserved set is escaped.
pub mod urlencoding {
    use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

    const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
        .remove(b'-')
        .remove(b'_')
        .remove(b'.')
        .remove(b'~');

    pub fn encode(s: &str) -> String {
        utf8_percent_encode(s, QUERY_VALUE).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("brewbooks/"));
        assert_eq!(config.relay_url, DEFAULT_RELAY);
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_relayed_url_is_encoded() {
        let client = HttpClient::new().expect("client");
        let relayed = client.relayed("https://librivox.org/api?format=json&limit=5");
        assert!(relayed.starts_with(DEFAULT_RELAY));
        assert!(relayed.contains("https%3A%2F%2Flibrivox.org"));
        assert!(!relayed[DEFAULT_RELAY.len()..].contains('?'));
    }

    #[test]
    fn test_urlencoding_unreserved_passthrough() {
        assert_eq!(urlencoding::encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(urlencoding::encode("a b"), "a%20b");
        assert_eq!(urlencoding::encode("q=^x"), "q%3D%5Ex");
    }

    #[tokio::test]
    async fn test_get_text_bad_url() {
        let client = HttpClient::new().expect("client");
        let result = client.get_text("not a url").await;
        assert!(result.is_err());
    }

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Local relay stand-in: counts hits and answers every request with the
    // given status and body.
    async fn spawn_relay(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        (format!("http://{addr}/raw?url="), hits)
    }

    fn client_with_relay(relay_url: String) -> HttpClient {
        HttpClient::with_config(ClientConfig {
            relay_url,
            ..ClientConfig::default()
        })
        .expect("client")
    }

    // Nothing listens on port 1, so the direct attempt always fails at
    // transport level and the fallback path is taken.
    const REFUSED_URL: &str = "http://127.0.0.1:1/page";

    #[tokio::test]
    async fn test_relay_fallback_fires_exactly_once() {
        let (relay_url, hits) = spawn_relay("HTTP/1.1 200 OK", "relayed body").await;
        let client = client_with_relay(relay_url);

        let body = client.get_text_with_relay(REFUSED_URL).await.expect("relayed");
        assert_eq!(body, "relayed body");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_relay_failure_surfaces_without_second_retry() {
        let (relay_url, hits) = spawn_relay("HTTP/1.1 500 Internal Server Error", "down").await;
        let client = client_with_relay(relay_url);

        let result = client.get_text_with_relay(REFUSED_URL).await;
        assert!(matches!(result, Err(NetworkError::Status { status: 500, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_direct_fetch_skips_relay() {
        let (relay_url, hits) = spawn_relay("HTTP/1.1 200 OK", "unused").await;
        let (direct_url, _) = spawn_relay("HTTP/1.1 200 OK", "direct body").await;
        let client = client_with_relay(relay_url);

        let body = client
            .get_text_with_relay(direct_url.trim_end_matches("/raw?url="))
            .await
            .expect("direct");
        assert_eq!(body, "direct body");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
