//! Article page fetching and paragraph extraction

use super::PageFetcher;
use crate::error::Result;
use async_trait::async_trait;
use cached::{Cached, SizedCache};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; advisor-rs)";

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("static selector is valid"));

/// Extract the text of every `<p>` element, joined by newlines
pub fn extract_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// HTTP [`PageFetcher`] with an LRU memo of extracted texts
pub struct HttpPageFetcher {
    client: Client,
    memo: Mutex<SizedCache<String, String>>,
}

impl HttpPageFetcher {
    /// Create a fetcher remembering up to `capacity` pages
    pub fn new(timeout: Duration, capacity: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            memo: Mutex::new(SizedCache::with_size(capacity.max(1))),
        })
    }

    /// Number of memoized pages
    pub async fn memoized(&self) -> usize {
        self.memo.lock().await.cache_size()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let key = url.to_string();
        if let Some(text) = self.memo.lock().await.cache_get(&key) {
            debug!(url, "Page memo hit");
            return Ok(text.clone());
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            // extraction still runs on whatever body came back
            warn!(url, %status, "Article page returned non-success status");
        }
        let body = response.text().await?;

        let text = extract_paragraphs(&body);
        self.memo.lock().await.cache_set(key, text.clone());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_paragraphs_in_document_order() {
        let html = r#"
            <html><body>
              <h1>Headline</h1>
              <p>First <b>bold</b> paragraph.</p>
              <div><p>Second paragraph.</p></div>
              <span>not a paragraph</span>
              <p>Third.</p>
            </body></html>
        "#;

        assert_eq!(
            extract_paragraphs(html),
            "First bold paragraph.\nSecond paragraph.\nThird."
        );
    }

    #[test]
    fn test_extract_paragraphs_without_paragraphs() {
        assert_eq!(extract_paragraphs("<html><body><div>x</div></body></html>"), "");
    }

    #[tokio::test]
    async fn test_memo_starts_empty() {
        let fetcher = HttpPageFetcher::new(Duration::from_secs(5), 4).unwrap();
        assert_eq!(fetcher.memoized().await, 0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_is_memoized() {
        let fetcher = HttpPageFetcher::new(Duration::from_secs(10), 4).unwrap();
        let first = fetcher.fetch_text("https://example.com").await.unwrap();
        let second = fetcher.fetch_text("https://example.com").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(fetcher.memoized().await, 1);
    }
}
