use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::config::PipelineConfig;

/// An article as returned by the extraction collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub content: String,
    pub authors: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub top_image: Option<String>,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
}

impl Article {
    pub fn metadata(&self) -> ArticleMetadata {
        ArticleMetadata {
            title: self.title.clone(),
            authors: self.authors.clone(),
            publish_date: self.published_at,
            top_image: self.top_image.clone(),
            keywords: self.keywords.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Pass-through metadata echoed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub top_image: Option<String>,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
}

/// A sentence-aligned slice of article text whose token count stays under the
/// chunk budget, unless a single sentence alone is already over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub token_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub max_length: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub min_length: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub num_beams: Option<i64>,
    pub lang: Option<String>,
}

/// Accepts `150`, `150.0` and `"150"`; fractions are truncated toward zero.
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Int(n)) => Ok(Some(n)),
        Some(Lenient::Float(f)) if f.is_finite() => Ok(Some(f.trunc() as i64)),
        Some(Lenient::Float(f)) => Err(de::Error::custom(format!("invalid integer: {}", f))),
        Some(Lenient::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid integer: {:?}", text))),
    }
}

/// Generation parameters after clamping; every value is in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryParams {
    pub max_length: usize,
    pub min_length: usize,
    pub num_beams: usize,
    pub lang: String,
}

impl SummaryParams {
    pub fn from_request(request: &SummaryRequest, config: &PipelineConfig) -> Self {
        let max_length = clamp_to(
            request.max_length,
            config.default_summary_length,
            config.max_summary_length,
        );
        let num_beams = clamp_to(request.num_beams, config.default_num_beams, config.max_num_beams);
        let min_length = match request.min_length {
            Some(min) if min > 0 => min as usize,
            _ => derive_min_length(max_length, config.min_summary_floor),
        }
        .min(max_length);
        let lang = request
            .lang
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(&config.default_lang)
            .to_string();

        Self {
            max_length,
            min_length,
            num_beams,
            lang,
        }
    }
}

fn clamp_to(requested: Option<i64>, default: usize, upper: usize) -> usize {
    let value = requested.unwrap_or(default as i64);
    value.clamp(1, upper.max(1) as i64) as usize
}

/// `max(round(max_length / 2), floor)`.
pub fn derive_min_length(max_length: usize, floor: usize) -> usize {
    ((max_length as f64 * 0.5).round() as usize).max(floor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub sentiment: SentimentLabel,
    pub polarity: f64,
    pub subjectivity: f64,
    pub confidence: f64,
}

impl SentimentRecord {
    pub fn unknown() -> Self {
        Self {
            sentiment: SentimentLabel::Unknown,
            polarity: 0.0,
            subjectivity: 0.0,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub summary: String,
    pub sentiment: SentimentRecord,
    pub article_metadata: ArticleMetadata,
    pub processing_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsResponse {
    pub audio_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(max_length: Option<i64>, num_beams: Option<i64>) -> SummaryRequest {
        SummaryRequest {
            url: "https://example.com".to_string(),
            max_length,
            num_beams,
            ..Default::default()
        }
    }

    #[test]
    fn test_numeric_fields_accept_floats_and_strings() {
        let request: SummaryRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "max_length": 150.0, "min_length": "60", "num_beams": 4.9}"#,
        )
        .unwrap();
        assert_eq!(request.max_length, Some(150));
        assert_eq!(request.min_length, Some(60));
        assert_eq!(request.num_beams, Some(4));

        let request: SummaryRequest = serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(request.max_length, None);
        assert!(serde_json::from_str::<SummaryRequest>(r#"{"max_length": "long"}"#).is_err());
        assert!(serde_json::from_str::<SummaryRequest>(r#"{"max_length": null}"#).is_ok());
    }

    #[test]
    fn test_max_length_is_clamped() {
        let config = PipelineConfig::default();
        assert_eq!(SummaryParams::from_request(&request(Some(5000), None), &config).max_length, 1024);
        assert_eq!(SummaryParams::from_request(&request(Some(0), None), &config).max_length, 1);
        assert_eq!(SummaryParams::from_request(&request(Some(-7), None), &config).max_length, 1);
        assert_eq!(SummaryParams::from_request(&request(None, None), &config).max_length, 150);
    }

    #[test]
    fn test_num_beams_is_clamped() {
        let config = PipelineConfig::default();
        assert_eq!(SummaryParams::from_request(&request(None, Some(20)), &config).num_beams, 8);
        assert_eq!(SummaryParams::from_request(&request(None, Some(0)), &config).num_beams, 1);
        assert_eq!(SummaryParams::from_request(&request(None, None), &config).num_beams, 4);
    }

    #[test]
    fn test_min_length_derivation() {
        assert_eq!(derive_min_length(100, 50), 50);
        assert_eq!(derive_min_length(300, 50), 150);
        assert_eq!(derive_min_length(20, 50), 50);

        let config = PipelineConfig::default();
        let params = SummaryParams::from_request(&request(Some(300), None), &config);
        assert_eq!(params.min_length, 150);

        // the floor never pushes min_length past max_length
        let params = SummaryParams::from_request(&request(Some(20), None), &config);
        assert_eq!(params.min_length, 20);
    }

    #[test]
    fn test_lang_defaults_to_english() {
        let config = PipelineConfig::default();
        assert_eq!(SummaryParams::from_request(&request(None, None), &config).lang, "en");

        let mut req = request(None, None);
        req.lang = Some("ro".to_string());
        assert_eq!(SummaryParams::from_request(&req, &config).lang, "ro");
    }

    #[test]
    fn test_sentiment_record_serializes_label_names() {
        let json = serde_json::to_value(SentimentRecord::unknown()).unwrap();
        assert_eq!(json["sentiment"], "Unknown");
        assert_eq!(json["confidence"], 0.0);
    }
}
