use std::fmt;
use std::sync::Arc;

use ns_core::{
    Error, LexicalSentimentAnalyzer, NeuralSentimentClassifier, Result, SentimentLabel,
    SentimentRecord,
};
use tracing::{debug, warn};

/// Fused scores strictly above this are positive, strictly below its negation negative.
pub const NEUTRAL_BAND: f64 = 0.2;
const CLASSIFIER_WEIGHT: f64 = 0.5;

/// Result of a sentiment pass: either a measured record or the fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentOutcome {
    Analyzed(SentimentRecord),
    Fallback { reason: String },
}

impl SentimentOutcome {
    pub fn into_record(self) -> SentimentRecord {
        match self {
            SentimentOutcome::Analyzed(record) => record,
            SentimentOutcome::Fallback { .. } => SentimentRecord::unknown(),
        }
    }
}

/// Combines the lexical polarity with the neural classifier's direction.
pub struct SentimentFusion {
    lexical: Arc<dyn LexicalSentimentAnalyzer>,
    classifier: Arc<dyn NeuralSentimentClassifier>,
    char_limit: usize,
}

impl fmt::Debug for SentimentFusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentFusion")
            .field("lexical", &self.lexical)
            .field("classifier", &self.classifier)
            .field("char_limit", &self.char_limit)
            .finish()
    }
}

impl SentimentFusion {
    pub fn new(
        lexical: Arc<dyn LexicalSentimentAnalyzer>,
        classifier: Arc<dyn NeuralSentimentClassifier>,
        char_limit: usize,
    ) -> Self {
        Self {
            lexical,
            classifier,
            char_limit,
        }
    }

    /// Never fails: any collaborator error yields the `Unknown` record.
    pub async fn analyze(&self, text: &str) -> SentimentRecord {
        self.assess(text).await.into_record()
    }

    pub async fn assess(&self, text: &str) -> SentimentOutcome {
        match self.measure(text).await {
            Ok(record) => {
                debug!("📊 Sentiment: {:?}", record);
                SentimentOutcome::Analyzed(record)
            }
            Err(e) => {
                warn!("⚠️ Sentiment analysis failed, falling back to Unknown: {}", e);
                SentimentOutcome::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn measure(&self, text: &str) -> Result<SentimentRecord> {
        let lexical = self.lexical.analyze(text)?;
        // The classifier sees a character prefix, not a token prefix.
        let classification = self.classifier.classify(truncate_chars(text, self.char_limit)).await?;

        let scores = [lexical.polarity, lexical.subjectivity, classification.score];
        if scores.iter().any(|score| !score.is_finite()) {
            return Err(Error::Sentiment(format!("non-finite score in {:?}", scores)));
        }

        let polarity = lexical.polarity.clamp(-1.0, 1.0);
        let fused = fuse(polarity, classification.is_positive());

        Ok(SentimentRecord {
            sentiment: classify(fused),
            polarity: round2(polarity),
            subjectivity: round2(lexical.subjectivity.clamp(0.0, 1.0)),
            confidence: round2(classification.score.clamp(0.0, 1.0)),
        })
    }
}

/// `(polarity ± 0.5) / 2`, positive sign for a POSITIVE classifier label.
pub fn fuse(polarity: f64, positive: bool) -> f64 {
    let direction = if positive { CLASSIFIER_WEIGHT } else { -CLASSIFIER_WEIGHT };
    (polarity + direction) / 2.0
}

pub fn classify(fused: f64) -> SentimentLabel {
    if fused > NEUTRAL_BAND {
        SentimentLabel::Positive
    } else if fused < -NEUTRAL_BAND {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ns_core::{Classification, LexicalScore};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FixedLexical(Option<LexicalScore>);

    impl LexicalSentimentAnalyzer for FixedLexical {
        fn analyze(&self, _text: &str) -> Result<LexicalScore> {
            self.0
                .ok_or_else(|| Error::Sentiment("lexicon unavailable".to_string()))
        }
    }

    #[derive(Debug)]
    struct FixedClassifier {
        result: Option<Classification>,
        seen: Mutex<Vec<String>>,
    }

    impl FixedClassifier {
        fn new(label: &str, score: f64) -> Self {
            Self {
                result: Some(Classification {
                    label: label.to_string(),
                    score,
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                result: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NeuralSentimentClassifier for FixedClassifier {
        async fn classify(&self, text: &str) -> Result<Classification> {
            self.seen.lock().unwrap().push(text.to_string());
            self.result
                .clone()
                .ok_or_else(|| Error::Sentiment("classifier crashed".to_string()))
        }
    }

    fn fusion(polarity: f64, subjectivity: f64, classifier: FixedClassifier) -> SentimentFusion {
        SentimentFusion::new(
            Arc::new(FixedLexical(Some(LexicalScore {
                polarity,
                subjectivity,
            }))),
            Arc::new(classifier),
            1024,
        )
    }

    #[test]
    fn test_fuse_and_classify() {
        assert_eq!(fuse(0.0, true), 0.25);
        assert_eq!(classify(fuse(0.0, true)), SentimentLabel::Positive);
        assert_eq!(fuse(0.0, false), -0.25);
        assert_eq!(classify(fuse(0.0, false)), SentimentLabel::Negative);
    }

    #[test]
    fn test_neutral_band_is_inclusive() {
        assert_eq!(classify(0.2), SentimentLabel::Neutral);
        assert_eq!(classify(-0.2), SentimentLabel::Neutral);
        assert_eq!(classify(0.0), SentimentLabel::Neutral);
        assert_eq!(classify(0.2001), SentimentLabel::Positive);
        assert_eq!(classify(-0.2001), SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_positive_record_is_rounded() {
        let fusion = fusion(0.0, 0.456, FixedClassifier::new("POSITIVE", 0.9));
        let record = fusion.analyze("Great news").await;
        assert_eq!(
            record,
            SentimentRecord {
                sentiment: SentimentLabel::Positive,
                polarity: 0.0,
                subjectivity: 0.46,
                confidence: 0.9,
            }
        );
    }

    #[tokio::test]
    async fn test_lexical_polarity_can_outweigh_classifier() {
        let fusion = fusion(0.8, 0.9, FixedClassifier::new("NEGATIVE", 0.6));
        let record = fusion.analyze("text").await;
        // (0.8 - 0.5) / 2 = 0.15
        assert_eq!(record.sentiment, SentimentLabel::Neutral);
        assert_eq!(record.polarity, 0.8);
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back() {
        let fusion = fusion(0.3, 0.3, FixedClassifier::failing());
        let outcome = fusion.assess("text").await;
        assert!(matches!(outcome, SentimentOutcome::Fallback { .. }));
        assert_eq!(outcome.into_record(), SentimentRecord::unknown());
    }

    #[tokio::test]
    async fn test_lexical_failure_falls_back() {
        let fusion = SentimentFusion::new(
            Arc::new(FixedLexical(None)),
            Arc::new(FixedClassifier::new("POSITIVE", 0.9)),
            1024,
        );
        assert_eq!(fusion.analyze("text").await, SentimentRecord::unknown());
    }

    #[tokio::test]
    async fn test_non_finite_scores_fall_back() {
        let fusion = fusion(f64::NAN, 0.1, FixedClassifier::new("POSITIVE", 0.9));
        assert_eq!(fusion.analyze("text").await, SentimentRecord::unknown());
    }

    #[tokio::test]
    async fn test_classifier_sees_character_prefix() {
        let classifier = Arc::new(FixedClassifier::new("POSITIVE", 0.7));
        let fusion = SentimentFusion::new(
            Arc::new(FixedLexical(Some(LexicalScore {
                polarity: 0.0,
                subjectivity: 0.0,
            }))),
            classifier.clone(),
            5,
        );
        fusion.analyze("ééééééééé long text").await;
        assert_eq!(classifier.seen.lock().unwrap()[0], "ééééé");
    }
}
