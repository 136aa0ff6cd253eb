use ns_core::{Result, Tokenizer};
use unicode_segmentation::UnicodeSegmentation;

const CHARS_PER_PIECE: usize = 8;

/// Approximates a sub-word tokenizer: every non-blank word-boundary segment
/// is one token, plus one more for each further 8 characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn token_count(&self, text: &str) -> Result<usize> {
        Ok(text
            .split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| 1 + segment.chars().count().saturating_sub(1) / CHARS_PER_PIECE)
            .sum())
    }
}
