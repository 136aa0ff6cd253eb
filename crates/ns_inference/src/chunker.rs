use std::fmt;
use std::sync::Arc;

use ns_core::{normalize_whitespace, Chunk, Result, Tokenizer};
use tracing::{debug, warn};

const SENTENCE_DELIMITER: &str = ". ";

/// Splits article text into sentence-aligned chunks under a token budget.
#[derive(Clone)]
pub struct TextChunker {
    tokenizer: Arc<dyn Tokenizer>,
}

impl fmt::Debug for TextChunker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextChunker")
            .field("tokenizer", &self.tokenizer)
            .finish()
    }
}

impl TextChunker {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Greedily packs sentences while `tokens(buffer + sentence) < max_tokens`.
    ///
    /// A sentence that is over budget on its own still becomes a single chunk.
    /// Joining the chunks with a space gives back the normalized input.
    pub fn chunk(&self, text: &str, max_tokens: usize) -> Result<Vec<Chunk>> {
        let text = normalize_whitespace(text);
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();
        let mut buffer = String::new();

        for sentence in split_sentences(&text) {
            let candidate = if buffer.is_empty() {
                sentence.clone()
            } else {
                format!("{} {}", buffer, sentence)
            };

            if self.tokenizer.token_count(&candidate)? < max_tokens {
                buffer = candidate;
                continue;
            }

            if !buffer.is_empty() {
                self.close(&mut chunks, std::mem::take(&mut buffer), max_tokens)?;
            }
            buffer = sentence;
        }

        if !buffer.is_empty() {
            self.close(&mut chunks, buffer, max_tokens)?;
        }

        debug!("Split {} characters into {} chunks", text.len(), chunks.len());
        Ok(chunks)
    }

    fn close(&self, chunks: &mut Vec<Chunk>, text: String, max_tokens: usize) -> Result<()> {
        let token_count = self.tokenizer.token_count(&text)?;
        if token_count >= max_tokens {
            warn!(
                "⚠️ Sentence of {} tokens exceeds the {} token budget, keeping it as one chunk",
                token_count, max_tokens
            );
        }
        chunks.push(Chunk {
            index: chunks.len(),
            text,
            token_count,
        });
        Ok(())
    }
}

/// Splits on ". " and puts the consumed period back on every sentence but the last.
fn split_sentences(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = text.split(SENTENCE_DELIMITER).collect();
    let last = pieces.len().saturating_sub(1);
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            if i < last {
                format!("{}.", piece)
            } else {
                piece.to_string()
            }
        })
        .collect()
}
