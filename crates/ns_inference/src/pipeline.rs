use std::sync::Arc;
use std::time::{Duration, Instant};

use ns_core::{
    normalize_whitespace, Article, ArticleExtractor, Error, PipelineConfig, ResponseEnvelope,
    Result, SentimentRecord, SummaryParams, SummaryRequest, TextToSpeechSynthesizer, TtsRequest,
    TtsResponse,
};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use url::Url;

use crate::chunker::TextChunker;
use crate::models::Gateways;
use crate::sentiment::SentimentFusion;
use crate::summary::SummaryEngine;

pub const INVALID_URL: &str = "Invalid URL format";
pub const EXTRACTION_FAILED: &str = "Failed to extract article content. Please check the URL.";
pub const TEXT_REQUIRED: &str = "Text is required";
pub const SYNTHESIS_FAILED: &str = "Failed to generate audio. Please try again.";

/// Validates requests and runs extraction, summarization and sentiment in order.
pub struct Orchestrator {
    config: PipelineConfig,
    extractor: Arc<dyn ArticleExtractor>,
    engine: SummaryEngine,
    sentiment: SentimentFusion,
    synthesizer: Arc<dyn TextToSpeechSynthesizer>,
    permits: Arc<Semaphore>,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        gateways: &Gateways,
        extractor: Arc<dyn ArticleExtractor>,
    ) -> Self {
        let chunker = TextChunker::new(gateways.tokenizer.clone());
        let engine = SummaryEngine::new(
            chunker,
            gateways.summarizer.clone(),
            config.chunk_token_budget,
            config.max_merge_depth,
        );
        let sentiment = SentimentFusion::new(
            gateways.lexical.clone(),
            gateways.classifier.clone(),
            config.classifier_char_limit,
        );
        let permits = Arc::new(Semaphore::new(config.max_concurrent_requests.max(1)));

        Self {
            config,
            extractor,
            engine,
            sentiment,
            synthesizer: gateways.synthesizer.clone(),
            permits,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn handle_summarize(&self, request: SummaryRequest) -> Result<ResponseEnvelope> {
        let started = Instant::now();
        validate_url(&request.url)?;
        let params = SummaryParams::from_request(&request, &self.config);
        info!(
            "📰 Summarizing {} (max_length={}, min_length={}, num_beams={}, lang={})",
            request.url, params.max_length, params.min_length, params.num_beams, params.lang
        );

        let timeout = self.config.request_timeout();
        let (article, summary, sentiment) = tokio::time::timeout(timeout, self.run(&request.url, &params))
            .await
            .map_err(|_| {
                warn!("⏱️ Request for {} timed out after {:?}", request.url, timeout);
                Error::Timeout(timeout)
            })??;

        let elapsed = started.elapsed();
        info!("✅ Summary ready for {} in {:?}", request.url, elapsed);

        Ok(ResponseEnvelope {
            summary,
            sentiment,
            article_metadata: article.metadata(),
            processing_time: format_elapsed(elapsed),
        })
    }

    async fn run(&self, url: &str, params: &SummaryParams) -> Result<(Article, String, SentimentRecord)> {
        // queueing for a permit counts against the request timeout
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| Error::External(e.into()))?;
        let article = self.extract(url).await?;
        let summary = self.engine.summarize(&article.content, params).await?;
        let sentiment = self.sentiment.analyze(&article.content).await;
        Ok((article, summary, sentiment))
    }

    async fn extract(&self, url: &str) -> Result<Article> {
        info!("🦗 Extracting article from {}", url);
        let mut article = match self.extractor.extract(url).await {
            Ok(article) => article,
            Err(e) => {
                error!("❌ Article extraction failed for {}: {}", url, e);
                return Err(Error::Extraction(EXTRACTION_FAILED.to_string()));
            }
        };

        article.content = normalize_whitespace(&article.content);
        if article.content.is_empty() {
            error!("❌ Article at {} has no text", url);
            return Err(Error::Extraction(EXTRACTION_FAILED.to_string()));
        }
        info!("📄 Extracted \"{}\" ({} characters)", article.title, article.content.len());
        Ok(article)
    }

    pub async fn handle_tts(&self, request: TtsRequest) -> Result<TtsResponse> {
        if request.text.trim().is_empty() {
            return Err(Error::Validation(TEXT_REQUIRED.to_string()));
        }
        let lang = request
            .lang
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(&self.config.default_lang);

        info!("🔊 Synthesizing {} characters ({})", request.text.len(), lang);
        let timeout = self.config.request_timeout();
        let synthesized = tokio::time::timeout(timeout, self.synthesizer.synthesize(&request.text, lang))
            .await
            .map_err(|_| Error::Timeout(timeout))?;

        match synthesized {
            Ok(path) => Ok(TtsResponse {
                audio_path: path.to_string_lossy().into_owned(),
            }),
            Err(e) => {
                error!("❌ TTS generation failed: {}", e);
                Err(Error::Synthesis(SYNTHESIS_FAILED.to_string()))
            }
        }
    }
}

pub fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    if url.is_empty() || !has_scheme || Url::parse(url).is_err() {
        return Err(Error::Validation(INVALID_URL.to_string()));
    }
    Ok(())
}

/// Renders a duration as `H:MM:SS.ffffff`, dropping the fraction when it is zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    let micros = elapsed.subsec_micros();
    if micros == 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}:{:02}.{:06}", hours, minutes, seconds, micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/news").is_ok());
        assert!(validate_url("http://example.com").is_ok());

        for bad in ["", "ftp://example.com", "example.com", "https://"] {
            let err = validate_url(bad).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{:?} should be rejected", bad);
            assert_eq!(err.to_string(), INVALID_URL);
        }
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0:00:00");
        assert_eq!(format_elapsed(Duration::from_millis(2_500)), "0:00:02.500000");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "1:02:05");
    }
}
