//! Page fetching.
//!
//! The pipeline stages only need "give me the HTML behind this URL", so they
//! are written against the [`FetchPage`] trait:
//! - [`HttpFetcher`]: real requests through a shared `reqwest::Client`
//! - tests substitute an in-memory fixture fetcher
//!
//! A failed request fails the run; nothing is retried.

use crate::config::CollectorConfig;
use crate::error::{PipelineError, Result};
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Fetch a page body as text.
pub trait FetchPage: fmt::Debug {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`FetchPage`] over HTTP.
///
/// Non-success statuses are reported as [`PipelineError::Network`].
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let network = |source| PipelineError::Network {
            url: url.to_string(),
            source,
        };

        let res = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(network);
        let body = match res {
            Ok(r) => r.text().await.map_err(network),
            Err(e) => Err(e),
        };

        let dt = t0.elapsed();
        match &body {
            Ok(b) => debug!(elapsed_ms = dt.as_millis() as u64, bytes = b.len(), "Fetched page"),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "Fetch failed"),
        }
        body
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixtureFetcher;
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection and answer it with `response`.
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/news/view.do?ncd=1")
    }

    #[test]
    fn test_http_fetcher_builds_from_default_config() {
        let fetcher = HttpFetcher::new(&CollectorConfig::default());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_http_fetcher_builds_without_timeout() {
        let config = CollectorConfig {
            request_timeout_secs: None,
            ..CollectorConfig::default()
        };
        assert!(HttpFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_http_fetcher_bad_user_agent_is_config_error() {
        let config = CollectorConfig {
            user_agent: "collector\nbroken".to_string(),
            ..CollectorConfig::default()
        };
        assert!(matches!(HttpFetcher::new(&config), Err(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn test_http_fetcher_returns_body() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: 11\r\nconnection: close\r\n\r\n<p>body</p>",
        )
        .await;
        let fetcher = HttpFetcher::new(&CollectorConfig::default()).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<p>body</p>");
    }

    #[tokio::test]
    async fn test_http_fetcher_error_status_is_network_error() {
        let url = serve_once(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n").await;
        let fetcher = HttpFetcher::new(&CollectorConfig::default()).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, PipelineError::Network { url: ref u, .. } if *u == url));
    }

    #[tokio::test]
    async fn test_http_fetcher_connection_refused_is_network_error() {
        let fetcher = HttpFetcher::new(&CollectorConfig::default()).unwrap();

        let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, PipelineError::Network { .. }));
    }

    #[tokio::test]
    async fn test_fixture_fetcher_records_requests() {
        let fetcher = FixtureFetcher::default().with_page("https://a.test/", "<p>a</p>");

        assert_eq!(fetcher.fetch("https://a.test/").await.unwrap(), "<p>a</p>");
        assert!(fetcher.fetch("https://b.test/").await.is_err());
        assert_eq!(fetcher.requested(), vec!["https://a.test/", "https://b.test/"]);
    }
}
