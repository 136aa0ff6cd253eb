use std::time::Duration;

use async_trait::async_trait;
use ns_core::{Article, ArticleExtractor, Error, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::parse::parse_article;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ns-summarizer/0.1)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Downloads a page and reads the article out of its HTML.
#[derive(Debug, Clone)]
pub struct HtmlArticleExtractor {
    client: Client,
}

impl HtmlArticleExtractor {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArticleExtractor for HtmlArticleExtractor {
    async fn extract(&self, url: &str) -> Result<Article> {
        let url = Url::parse(url)
            .map_err(|e| Error::Extraction(format!("Failed to parse URL: {}", e)))?;

        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), url);

        parse_article(&url, &html)
    }
}
