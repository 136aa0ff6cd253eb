use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    /// Fetch and parse the article behind `url`.
    async fn extract(&self, url: &str) -> Result<Article>;
}
