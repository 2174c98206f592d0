//! Page fetching over HTTP

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::crawler::error::CrawlError;
use crate::crawler::{CrawlerConfig, FetchedPage, PageContent};

/// Something that can retrieve a page for a URL
///
/// Implementations must not fail: every problem is reported as
/// [`PageContent::Unavailable`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, returning its body or the `Unavailable` sentinel
    async fn fetch(&self, url: &str) -> PageContent;
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// The underlying reqwest client, carrying timeout and user agent
    client: ReqwestClient,
}

impl HttpFetcher {
    /// Create a fetcher using the timeout and user agent from `config`
    pub fn new(config: &CrawlerConfig) -> crate::error::Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(CrawlError::from)?;

        Ok(Self { client })
    }

    /// Fetch `url`, keeping the reason for a failure
    ///
    /// The response status is recorded but not checked: an error page still
    /// has a body worth parsing.
    #[instrument(skip(self), level = "debug")]
    pub async fn try_fetch(&self, url: &str) -> Result<FetchedPage, CrawlError> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CrawlError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let response = self.client.get(parsed).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "Fetched page");
        Ok(FetchedPage { status, body })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> PageContent {
        match self.try_fetch(url).await {
            Ok(page) => PageContent::Page(page),
            Err(e) => {
                warn!(%url, error = %e, "Fetch failed, continuing without content");
                PageContent::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> HttpFetcher {
        let config = CrawlerConfig::builder().timeout_secs(5).build();
        HttpFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/article")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><head><title>x</title></head></html>")
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/article", server.url());
        let content = fetcher().fetch(&url).await;

        assert_eq!(
            content,
            PageContent::Page(FetchedPage {
                status: 200,
                body: "<html><head><title>x</title></head></html>".to_string(),
            })
        );
        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_still_returns_body() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        let page = fetcher().try_fetch(&url).await.unwrap();

        assert_eq!(page.status, 404);
        assert_eq!(page.body, "not found");
        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_sends_configured_user_agent() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/")
            .match_header("user-agent", "linkmeta-test")
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;

        let config = CrawlerConfig::builder().user_agent("linkmeta-test").build();
        let fetcher = HttpFetcher::new(&config).unwrap();
        let content = fetcher.fetch(&format!("{}/", server.url())).await;

        assert!(!content.is_unavailable());
        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_url_is_unavailable() {
        let fetcher = fetcher();

        assert!(matches!(
            fetcher.try_fetch("not a url").await,
            Err(CrawlError::UrlParse(_))
        ));
        assert_eq!(fetcher.fetch("not a url").await, PageContent::Unavailable);
        assert_eq!(fetcher.fetch("").await, PageContent::Unavailable);
    }

    #[tokio::test]
    async fn test_non_http_scheme_is_unavailable() {
        let fetcher = fetcher();

        assert!(matches!(
            fetcher.try_fetch("ftp://example.com/file").await,
            Err(CrawlError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
        assert_eq!(
            fetcher.fetch("mailto:someone@example.com").await,
            PageContent::Unavailable
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        // Port 1 is privileged and not listening in test environments
        let content = fetcher().fetch("http://127.0.0.1:1/").await;
        assert_eq!(content, PageContent::Unavailable);
    }
}
