use std::collections::HashMap;

use lazy_static::lazy_static;
use ns_core::{LexicalScore, LexicalSentimentAnalyzer, Result};

const NEGATION_FACTOR: f64 = -0.5;
const INTENSIFIER_FACTOR: f64 = 1.3;

lazy_static! {
    /// word -> (polarity, subjectivity)
    static ref LEXICON: HashMap<&'static str, (f64, f64)> = [
        ("good", (0.7, 0.6)),
        ("great", (0.8, 0.75)),
        ("excellent", (1.0, 1.0)),
        ("amazing", (0.6, 0.9)),
        ("wonderful", (1.0, 1.0)),
        ("best", (1.0, 0.3)),
        ("better", (0.5, 0.5)),
        ("positive", (0.23, 0.55)),
        ("happy", (0.8, 1.0)),
        ("success", (0.3, 0.4)),
        ("successful", (0.75, 0.95)),
        ("breakthrough", (0.4, 0.5)),
        ("win", (0.8, 0.4)),
        ("growth", (0.3, 0.3)),
        ("improve", (0.4, 0.4)),
        ("improved", (0.4, 0.4)),
        ("strong", (0.43, 0.73)),
        ("safe", (0.5, 0.5)),
        ("major", (0.06, 0.5)),
        ("important", (0.4, 1.0)),
        ("love", (0.5, 0.6)),
        ("hope", (0.3, 0.5)),
        ("bad", (-0.7, 0.67)),
        ("worse", (-0.4, 0.6)),
        ("worst", (-1.0, 1.0)),
        ("terrible", (-1.0, 1.0)),
        ("awful", (-1.0, 1.0)),
        ("poor", (-0.4, 0.6)),
        ("negative", (-0.3, 0.4)),
        ("sad", (-0.5, 1.0)),
        ("fail", (-0.5, 0.3)),
        ("failed", (-0.5, 0.3)),
        ("failure", (-0.3, 0.3)),
        ("crisis", (-0.5, 0.4)),
        ("loss", (-0.4, 0.3)),
        ("weak", (-0.38, 0.63)),
        ("dangerous", (-0.6, 0.9)),
        ("death", (-0.6, 0.4)),
        ("angry", (-0.5, 1.0)),
        ("wrong", (-0.5, 0.9)),
        ("hate", (-0.8, 0.9)),
        ("fear", (-0.4, 0.6)),
    ]
    .into_iter()
    .collect();
}

/// Lexicon-based polarity and subjectivity scorer.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl LexicalSentimentAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Result<LexicalScore> {
        let mut modifier = 1.0;
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        let words = text
            .split(|c: char| !(c.is_alphabetic() || c == '\''))
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase);

        for word in words {
            if is_negation(&word) {
                modifier *= NEGATION_FACTOR;
                continue;
            }
            if is_intensifier(&word) {
                modifier *= INTENSIFIER_FACTOR;
                continue;
            }
            if let Some(&(polarity, subjectivity)) = LEXICON.get(word.as_str()) {
                polarities.push((polarity * modifier).clamp(-1.0, 1.0));
                subjectivities.push((subjectivity * f64::abs(modifier)).clamp(0.0, 1.0));
                modifier = 1.0;
            }
        }

        if polarities.is_empty() {
            return Ok(LexicalScore {
                polarity: 0.0,
                subjectivity: 0.0,
            });
        }

        let count = polarities.len() as f64;
        Ok(LexicalScore {
            polarity: polarities.iter().sum::<f64>() / count,
            subjectivity: subjectivities.iter().sum::<f64>() / count,
        })
    }
}

fn is_negation(word: &str) -> bool {
    matches!(word, "not" | "no" | "never") || word.ends_with("n't")
}

fn is_intensifier(word: &str) -> bool {
    matches!(word, "very" | "really" | "extremely")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> LexicalScore {
        LexiconAnalyzer::new().analyze(text).unwrap()
    }

    #[test]
    fn test_unscored_text_is_neutral() {
        assert_eq!(score("The committee met on Tuesday."), LexicalScore { polarity: 0.0, subjectivity: 0.0 });
        assert_eq!(score(""), LexicalScore { polarity: 0.0, subjectivity: 0.0 });
    }

    #[test]
    fn test_scores_are_averaged() {
        let result = score("A good day and a bad night.");
        assert!(result.polarity.abs() < 1e-9);
        assert!((result.subjectivity - 0.635).abs() < 1e-9);
    }

    #[test]
    fn test_negation_flips_and_softens() {
        let result = score("This is not good.");
        assert!((result.polarity - (-0.35)).abs() < 1e-9);

        let result = score("It isn't great");
        assert!(result.polarity < 0.0);
    }

    #[test]
    fn test_intensifier_is_clamped() {
        let result = score("An extremely excellent result");
        assert_eq!(result.polarity, 1.0);
        assert_eq!(result.subjectivity, 1.0);
    }

    #[test]
    fn test_modifier_resets_after_scored_word() {
        let result = score("not good, good");
        assert!((result.polarity - 0.175).abs() < 1e-9);
    }
}
