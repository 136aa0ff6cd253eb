pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod types;

pub use config::{InferenceConfig, PipelineConfig};
pub use error::{Error, Result};
pub use extractor::ArticleExtractor;
pub use models::{
    AbstractiveSummarizer, Classification, GenerationOptions, GenerationPolicy, LexicalScore,
    LexicalSentimentAnalyzer, NeuralSentimentClassifier, TextToSpeechSynthesizer, Tokenizer,
};
pub use types::{
    Article, ArticleMetadata, Chunk, ResponseEnvelope, SentimentLabel, SentimentRecord,
    SummaryParams, SummaryRequest, TtsRequest, TtsResponse,
};

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
