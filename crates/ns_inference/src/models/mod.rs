use std::sync::Arc;

use ns_core::{
    AbstractiveSummarizer, Error, InferenceConfig, LexicalSentimentAnalyzer,
    NeuralSentimentClassifier, Result, TextToSpeechSynthesizer, Tokenizer,
};

pub mod dummy;
pub mod lexicon;
pub mod remote;
pub mod tokenizer;
pub mod tts;

pub use dummy::DummyModel;
pub use lexicon::LexiconAnalyzer;
pub use remote::RemoteModel;
pub use tokenizer::HeuristicTokenizer;
pub use tts::GoogleTts;

pub const DEFAULT_MODEL_URL: &str = "http://localhost:8080";

/// Model collaborators, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Gateways {
    pub tokenizer: Arc<dyn Tokenizer>,
    pub summarizer: Arc<dyn AbstractiveSummarizer>,
    pub lexical: Arc<dyn LexicalSentimentAnalyzer>,
    pub classifier: Arc<dyn NeuralSentimentClassifier>,
    pub synthesizer: Arc<dyn TextToSpeechSynthesizer>,
}

impl Gateways {
    /// Offline stand-ins for every model.
    pub fn dummy() -> Self {
        let model = Arc::new(DummyModel::new());
        Self {
            tokenizer: Arc::new(HeuristicTokenizer),
            summarizer: model.clone(),
            lexical: Arc::new(LexiconAnalyzer::new()),
            classifier: model.clone(),
            synthesizer: model,
        }
    }
}

pub fn create_gateways(config: &InferenceConfig) -> Result<Gateways> {
    match config.model.to_lowercase().as_str() {
        "remote" => {
            let url = config.model_url.as_deref().unwrap_or(DEFAULT_MODEL_URL);
            let model = Arc::new(RemoteModel::new(url, config.api_key.clone())?);
            Ok(Gateways {
                tokenizer: Arc::new(HeuristicTokenizer),
                summarizer: model.clone(),
                lexical: Arc::new(LexiconAnalyzer::new()),
                classifier: model,
                synthesizer: Arc::new(GoogleTts::new()?),
            })
        }
        "dummy" => Ok(Gateways::dummy()),
        other => Err(Error::Config(format!(
            "Unknown model: {}. Available models: remote (default), dummy",
            other
        ))),
    }
}
