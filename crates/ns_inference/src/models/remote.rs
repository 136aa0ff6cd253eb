use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{
    AbstractiveSummarizer, Classification, Error, GenerationOptions, NeuralSentimentClassifier,
    Result,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
    parameters: SummarizeParameters,
}

#[derive(Serialize)]
struct SummarizeParameters {
    max_length: usize,
    min_length: usize,
    num_beams: usize,
    early_stopping: bool,
    length_penalty: f64,
    no_repeat_ngram_size: usize,
}

impl From<&GenerationOptions> for SummarizeParameters {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            max_length: options.max_length,
            min_length: options.min_length,
            num_beams: options.num_beams,
            early_stopping: options.policy.early_stopping,
            length_penalty: options.policy.length_penalty,
            no_repeat_ngram_size: options.policy.no_repeat_ngram_size,
        }
    }
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

/// Pipelines answer either `[{..}]` or `[[{..}, ..]]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Flat(Vec<Classification>),
    Nested(Vec<Vec<Classification>>),
}

impl ClassifyResponse {
    fn best(self) -> Option<Classification> {
        let candidates = match self {
            ClassifyResponse::Flat(list) => list,
            ClassifyResponse::Nested(lists) => lists.into_iter().flatten().collect(),
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Summarizer and sentiment classifier served over HTTP by a model server.
pub struct RemoteModel {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl fmt::Debug for RemoteModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl RemoteModel {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid model URL {}: {}", base_url, e)))?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let mut request = self.client.post(self.endpoint(path)).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl AbstractiveSummarizer for RemoteModel {
    fn name(&self) -> &str {
        "Remote"
    }

    async fn generate(&self, text: &str, options: &GenerationOptions) -> Result<String> {
        let request = SummarizeRequest {
            inputs: text,
            parameters: options.into(),
        };
        let outputs: Vec<SummaryOutput> = self.post("summarize", &request).await?;
        let summary = outputs
            .into_iter()
            .next()
            .map(|output| output.summary_text)
            .ok_or_else(|| Error::Generation("model server returned no summary".to_string()))?;
        debug!("Generated summary: {}", summary);
        Ok(summary)
    }
}

#[async_trait]
impl NeuralSentimentClassifier for RemoteModel {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let response: ClassifyResponse = self.post("classify", &ClassifyRequest { inputs: text }).await?;
        response
            .best()
            .ok_or_else(|| Error::Sentiment("model server returned no label".to_string()))
    }
}
