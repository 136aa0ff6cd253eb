use std::fmt;
use std::sync::Arc;

use ns_core::{
    AbstractiveSummarizer, Error, GenerationOptions, GenerationPolicy, Result, SummaryParams,
};
use tracing::{error, info};

use crate::chunker::TextChunker;

pub const GENERATION_FAILED: &str = "Failed to generate summary. Please try again.";

/// Summarizes each chunk, then merges the partial summaries level by level
/// until a single chunk remains or the merge depth runs out.
pub struct SummaryEngine {
    chunker: TextChunker,
    summarizer: Arc<dyn AbstractiveSummarizer>,
    policy: GenerationPolicy,
    chunk_token_budget: usize,
    max_merge_depth: usize,
}

impl fmt::Debug for SummaryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryEngine")
            .field("summarizer", &self.summarizer.name())
            .field("chunk_token_budget", &self.chunk_token_budget)
            .field("max_merge_depth", &self.max_merge_depth)
            .finish()
    }
}

impl SummaryEngine {
    pub fn new(
        chunker: TextChunker,
        summarizer: Arc<dyn AbstractiveSummarizer>,
        chunk_token_budget: usize,
        max_merge_depth: usize,
    ) -> Self {
        Self {
            chunker,
            summarizer,
            policy: GenerationPolicy::default(),
            chunk_token_budget,
            max_merge_depth,
        }
    }

    pub fn with_policy(mut self, policy: GenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Any tokenizer or generation failure, including a merge that never
    /// converges, surfaces as a single `Error::Generation`.
    pub async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String> {
        match self.summarize_levels(text, params).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                error!("❌ Summary generation failed: {}", e);
                Err(Error::Generation(GENERATION_FAILED.to_string()))
            }
        }
    }

    async fn summarize_levels(&self, text: &str, params: &SummaryParams) -> Result<String> {
        let options = GenerationOptions {
            max_length: params.max_length,
            min_length: params.min_length,
            num_beams: params.num_beams,
            policy: self.policy,
        };

        let mut text = text.to_string();
        for level in 0..=self.max_merge_depth {
            let mut summaries = self.summarize_chunks(&text, &options).await?;
            match summaries.len() {
                0 => return Err(Error::Generation("no text to summarize".to_string())),
                1 => {
                    let summary = summaries.remove(0);
                    if summary.trim().is_empty() {
                        return Err(Error::Generation("model returned an empty summary".to_string()));
                    }
                    return Ok(summary);
                }
                n => {
                    info!("🔁 Merging {} intermediate summaries (level {})", n, level + 1);
                    text = summaries.join(" ");
                }
            }
        }

        Err(Error::Generation(format!(
            "summaries did not converge to a single chunk after {} merge levels",
            self.max_merge_depth
        )))
    }

    async fn summarize_chunks(&self, text: &str, options: &GenerationOptions) -> Result<Vec<String>> {
        let chunks = self.chunker.chunk(text, self.chunk_token_budget)?;
        info!("✂️ Text split into {} chunks", chunks.len());

        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            info!(
                "🤖 Summarizing chunk {}/{} ({} tokens)",
                chunk.index + 1,
                chunks.len(),
                chunk.token_count
            );
            summaries.push(self.summarizer.generate(&chunk.text, options).await?);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ns_core::Tokenizer;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        fn token_count(&self, text: &str) -> Result<usize> {
            Ok(text.split_whitespace().count())
        }
    }

    /// Replays canned outputs and records every call.
    #[derive(Debug, Default)]
    struct ScriptedSummarizer {
        outputs: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<(String, GenerationOptions)>>,
        echo: bool,
    }

    impl ScriptedSummarizer {
        fn replaying(outputs: &[&str]) -> Self {
            Self {
                outputs: Mutex::new(outputs.iter().map(|s| s.to_string()).collect()),
                ..Default::default()
            }
        }

        fn echoing() -> Self {
            Self {
                echo: true,
                ..Default::default()
            }
        }

        fn inputs(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(text, _)| text.clone()).collect()
        }
    }

    #[async_trait]
    impl AbstractiveSummarizer for ScriptedSummarizer {
        fn name(&self) -> &str {
            "Scripted"
        }

        async fn generate(&self, text: &str, options: &GenerationOptions) -> Result<String> {
            self.calls.lock().unwrap().push((text.to_string(), *options));
            if self.echo {
                return Ok(text.to_string());
            }
            self.outputs
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::Generation("script exhausted".to_string()))
        }
    }

    fn engine(summarizer: Arc<ScriptedSummarizer>, budget: usize) -> SummaryEngine {
        SummaryEngine::new(TextChunker::new(Arc::new(WordTokenizer)), summarizer, budget, 4)
    }

    fn params() -> SummaryParams {
        SummaryParams {
            max_length: 150,
            min_length: 75,
            num_beams: 4,
            lang: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_chunk_returns_model_output() {
        let summarizer = Arc::new(ScriptedSummarizer::replaying(&["Water found on Mars."]));
        let engine = engine(summarizer.clone(), 1024);

        let text = "Scientists discover water on Mars. This is a major breakthrough.";
        let summary = engine.summarize(text, &params()).await.unwrap();

        assert_eq!(summary, "Water found on Mars.");
        assert_eq!(summarizer.inputs(), vec![text.to_string()]);
    }

    #[tokio::test]
    async fn test_single_chunk_output_is_not_rewritten() {
        let summarizer = Arc::new(ScriptedSummarizer::replaying(&["  Water found on Mars.\n"]));
        let engine = engine(summarizer, 1024);
        let summary = engine.summarize("Water on Mars.", &params()).await.unwrap();
        assert_eq!(summary, "  Water found on Mars.\n");
    }

    #[tokio::test]
    async fn test_blank_model_output_fails() {
        let summarizer = Arc::new(ScriptedSummarizer::replaying(&[" \n "]));
        let engine = engine(summarizer, 1024);
        let err = engine.summarize("Water on Mars.", &params()).await.unwrap_err();
        assert_eq!(err.to_string(), GENERATION_FAILED);
    }

    #[tokio::test]
    async fn test_generation_options_carry_policy() {
        let summarizer = Arc::new(ScriptedSummarizer::replaying(&["ok"]));
        let engine = engine(summarizer.clone(), 1024);
        engine.summarize("Short text.", &params()).await.unwrap();

        let calls = summarizer.calls.lock().unwrap();
        let options = calls[0].1;
        assert_eq!(options.max_length, 150);
        assert_eq!(options.min_length, 75);
        assert_eq!(options.num_beams, 4);
        assert!(options.policy.early_stopping);
        assert_eq!(options.policy.length_penalty, 2.0);
        assert_eq!(options.policy.no_repeat_ngram_size, 3);
    }

    #[tokio::test]
    async fn test_multiple_chunks_are_merged() {
        let summarizer = Arc::new(ScriptedSummarizer::replaying(&["A", "B", "C", "Final."]));
        let engine = engine(summarizer.clone(), 4);

        let text = "one two three. four five six. seven eight nine.";
        let summary = engine.summarize(text, &params()).await.unwrap();

        assert_eq!(summary, "Final.");
        assert_eq!(
            summarizer.inputs(),
            vec!["one two three.", "four five six.", "seven eight nine.", "A B C"]
        );
    }

    #[tokio::test]
    async fn test_non_converging_merge_is_bounded() {
        let summarizer = Arc::new(ScriptedSummarizer::echoing());
        let engine = engine(summarizer.clone(), 4);

        let text = "one two three. four five six. seven eight nine.";
        let err = engine.summarize(text, &params()).await.unwrap_err();

        assert!(matches!(err, Error::Generation(ref msg) if msg == GENERATION_FAILED));
        // three chunks on the first pass and on each of the four merge levels
        assert_eq!(summarizer.inputs().len(), 15);
    }

    #[tokio::test]
    async fn test_gateway_failure_discards_partial_results() {
        let summarizer = Arc::new(ScriptedSummarizer::replaying(&["A"]));
        let engine = engine(summarizer.clone(), 4);

        let text = "one two three. four five six.";
        let err = engine.summarize(text, &params()).await.unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        assert_eq!(err.to_string(), GENERATION_FAILED);
    }

    #[tokio::test]
    async fn test_empty_text_fails() {
        let summarizer = Arc::new(ScriptedSummarizer::replaying(&[]));
        let engine = engine(summarizer.clone(), 1024);
        assert!(engine.summarize("   ", &params()).await.is_err());
        assert!(summarizer.inputs().is_empty());
    }
}
