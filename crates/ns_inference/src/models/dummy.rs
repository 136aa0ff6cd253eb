use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use ns_core::{
    AbstractiveSummarizer, Classification, GenerationOptions, LexicalSentimentAnalyzer,
    NeuralSentimentClassifier, Result, TextToSpeechSynthesizer,
};

use super::lexicon::LexiconAnalyzer;

const SUMMARY_WORDS: usize = 20;

/// Deterministic offline model used for development and tests.
#[derive(Default)]
pub struct DummyModel {
    lexicon: LexiconAnalyzer,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AbstractiveSummarizer for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, text: &str, options: &GenerationOptions) -> Result<String> {
        // Take the first words, never more than max_length of them
        let words: Vec<&str> = text
            .split_whitespace()
            .take(SUMMARY_WORDS.min(options.max_length))
            .collect();
        Ok(words.join(" "))
    }
}

#[async_trait]
impl NeuralSentimentClassifier for DummyModel {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let polarity = self.lexicon.analyze(text)?.polarity;
        let label = if polarity >= 0.0 { "POSITIVE" } else { "NEGATIVE" };
        Ok(Classification {
            label: label.to_string(),
            score: 0.5 + polarity.abs().min(1.0) / 2.0,
        })
    }
}

#[async_trait]
impl TextToSpeechSynthesizer for DummyModel {
    /// Writes the transcript instead of audio.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("ns-tts-{}-", lang))
            .suffix(".txt")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }
}
