use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::Result;

/// Counts model tokens for a piece of text.
pub trait Tokenizer: Send + Sync + fmt::Debug {
    fn token_count(&self, text: &str) -> Result<usize>;
}

/// Fixed knobs passed with every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationPolicy {
    pub early_stopping: bool,
    pub length_penalty: f64,
    pub no_repeat_ngram_size: usize,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            early_stopping: true,
            length_penalty: 2.0,
            no_repeat_ngram_size: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_length: usize,
    pub min_length: usize,
    pub num_beams: usize,
    pub policy: GenerationPolicy,
}

#[async_trait]
pub trait AbstractiveSummarizer: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Generate an abstractive summary of `text`.
    async fn generate(&self, text: &str, options: &GenerationOptions) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LexicalScore {
    pub polarity: f64,
    pub subjectivity: f64,
}

pub trait LexicalSentimentAnalyzer: Send + Sync + fmt::Debug {
    fn analyze(&self, text: &str) -> Result<LexicalScore>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

impl Classification {
    pub fn is_positive(&self) -> bool {
        self.label.eq_ignore_ascii_case("POSITIVE")
    }
}

#[async_trait]
pub trait NeuralSentimentClassifier: Send + Sync + fmt::Debug {
    async fn classify(&self, text: &str) -> Result<Classification>;
}

#[async_trait]
pub trait TextToSpeechSynthesizer: Send + Sync + fmt::Debug {
    /// Render `text` to an audio file and return its path.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<PathBuf>;
}
