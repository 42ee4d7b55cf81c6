use crate::feed::types::Feed;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const MAX_FEED_LIST_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Default request timeout for HTTP retrieval.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while retrieving the feed list.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Local feed list could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Payload was not a JSON array of feed records
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Payload exceeded the 10MB size limit
    #[error("Feed list too large")]
    ResponseTooLarge,
    /// The background retrieval task died before producing a result
    #[error("Retrieval task failed: {0}")]
    TaskFailed(String),
}

/// Source of the feed list.
///
/// The listing core only knows this capability; transport, format and retry
/// policy belong to the implementation.
#[async_trait]
pub trait FeedRetriever: Send + Sync {
    /// Retrieve the full feed list, in publication order.
    async fn retrieve_feed_list(&self) -> Result<Vec<Feed>, RetrieveError>;

    /// Human-readable description of where feeds come from (for logs).
    fn source(&self) -> &str;
}

/// Pick a retriever for a configured source.
///
/// `http://` and `https://` sources are fetched over the network; anything
/// else is treated as a path to a local JSON file.
pub fn retriever_for(
    source: &str,
    timeout: Duration,
) -> Result<Arc<dyn FeedRetriever>, RetrieveError> {
    match url::Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Arc::new(HttpFeedRetriever::new(source, timeout)?))
        }
        _ => Ok(Arc::new(FileFeedRetriever::new(source))),
    }
}

/// Retrieves the feed list from an HTTP(S) endpoint.
pub struct HttpFeedRetriever {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpFeedRetriever {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RetrieveError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pricegrid/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, url, timeout))
    }

    /// Use a caller-provided client (shared connection pool, custom TLS).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FeedRetriever for HttpFeedRetriever {
    async fn retrieve_feed_list(&self) -> Result<Vec<Feed>, RetrieveError> {
        let response = tokio::time::timeout(self.timeout, self.client.get(&self.url).send())
            .await
            .map_err(|_| RetrieveError::Timeout(self.timeout.as_secs()))?
            .map_err(RetrieveError::Network)?;

        if !response.status().is_success() {
            return Err(RetrieveError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_LIST_SIZE).await?;
        let feeds = parse_feed_list(&bytes)?;
        tracing::debug!(url = %self.url, count = feeds.len(), "Retrieved feed list");
        Ok(feeds)
    }

    fn source(&self) -> &str {
        &self.url
    }
}

/// Reads the feed list from a JSON file on disk.
pub struct FileFeedRetriever {
    path: PathBuf,
    display: String,
}

impl FileFeedRetriever {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }

    fn io_error(&self, source: std::io::Error) -> RetrieveError {
        RetrieveError::Io {
            path: self.display.clone(),
            source,
        }
    }
}

#[async_trait]
impl FeedRetriever for FileFeedRetriever {
    async fn retrieve_feed_list(&self) -> Result<Vec<Feed>, RetrieveError> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        if meta.len() > MAX_FEED_LIST_SIZE as u64 {
            return Err(RetrieveError::ResponseTooLarge);
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        let feeds = parse_feed_list(&bytes)?;
        tracing::debug!(path = %self.display, count = feeds.len(), "Read feed list");
        Ok(feeds)
    }

    fn source(&self) -> &str {
        &self.display
    }
}

/// Parse a JSON array of feed records.
///
/// Names key item widgets, so a repeated name keeps its first occurrence and
/// later duplicates are dropped.
pub fn parse_feed_list(bytes: &[u8]) -> Result<Vec<Feed>, RetrieveError> {
    let raw: Vec<Feed> = serde_json::from_slice(bytes)?;

    let mut seen = HashSet::with_capacity(raw.len());
    let mut feeds = Vec::with_capacity(raw.len());
    for feed in raw {
        if seen.contains(&feed.name) {
            tracing::warn!(name = %feed.name, "Duplicate feed name in list, keeping first");
            continue;
        }
        seen.insert(feed.name.clone());
        feeds.push(feed);
    }
    Ok(feeds)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, RetrieveError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(RetrieveError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(RetrieveError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(RetrieveError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
