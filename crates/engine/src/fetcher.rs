use std::time::Duration;

use reqwest::header::{DATE, HeaderMap, LAST_MODIFIED};

/// Pages larger than this are refused before they reach the HTML parser.
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// An annotated page as fetched by the worker.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub uri: String,
    pub status: u16,
    /// `Last-Modified` if present, otherwise `Date`
    pub date: Option<String>,
    pub body: String,
}

/// HTTP client used to fetch annotated pages.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("domain-mailer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client (proxies, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// GET the page at `uri`. Non-success responses are errors.
    pub async fn fetch(&self, uri: &str) -> anyhow::Result<FetchedPage> {
        let mut response = self.client.get(uri).send().await?;
        let status = response.status();

        for (name, value) in response.headers() {
            tracing::debug!(
                uri,
                header = %name,
                value = value.to_str().unwrap_or("<non-ascii>"),
                "Page response header"
            );
        }

        if !status.is_success() {
            anyhow::bail!("Fetching {} returned HTTP {}", uri, status);
        }

        if let Some(length) = response.content_length()
            && length > self.max_body_bytes as u64
        {
            anyhow::bail!(
                "Page {} declares {} bytes, limit is {}",
                uri,
                length,
                self.max_body_bytes
            );
        }

        let date = page_date(response.headers());

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_body_bytes {
                anyhow::bail!("Page {} exceeds {} bytes", uri, self.max_body_bytes);
            }
            bytes.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(FetchedPage {
            uri: uri.to_string(),
            status: status.as_u16(),
            date,
            body,
        })
    }
}

/// Cache validator for a response: `Last-Modified`, falling back to `Date`.
pub fn page_date(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LAST_MODIFIED)
        .or_else(|| headers.get(DATE))
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
