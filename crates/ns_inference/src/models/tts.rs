use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{Error, Result, TextToSpeechSynthesizer};
use reqwest::Client;
use tracing::debug;

const TTS_URL: &str = "https://translate.google.com/translate_tts";
const MAX_PIECE_CHARS: usize = 100;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

/// Google Translate speech endpoint, fetched piecewise into one MP3 file.
pub struct GoogleTts {
    client: Client,
    base_url: String,
}

impl fmt::Debug for GoogleTts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTts")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleTts {
    pub fn new() -> Result<Self> {
        Self::with_base_url(TTS_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    async fn fetch_piece(&self, piece: &str, lang: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = piece.chars().count().to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", piece),
                ("tl", lang),
                ("client", "tw-ob"),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl TextToSpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<PathBuf> {
        let pieces = split_pieces(text, MAX_PIECE_CHARS);
        if pieces.is_empty() {
            return Err(Error::Synthesis("nothing to synthesize".to_string()));
        }

        let mut file = tempfile::Builder::new()
            .prefix("ns-tts-")
            .suffix(".mp3")
            .tempfile()?;
        for (idx, piece) in pieces.iter().enumerate() {
            debug!("🔊 Fetching speech piece {}/{}", idx + 1, pieces.len());
            let audio = self.fetch_piece(piece, lang, idx, pieces.len()).await?;
            file.write_all(&audio)?;
        }
        file.flush()?;

        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }
}

/// Splits text on whitespace into pieces of at most `max_chars` characters;
/// a single word longer than that is cut at character boundaries.
fn split_pieces(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }

        if current_len > 0 {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word_len <= max_chars {
            current.push_str(word);
            current_len = word_len;
        } else {
            let chars: Vec<char> = word.chars().collect();
            for part in chars.chunks(max_chars) {
                pieces.push(part.iter().collect());
            }
        }
    }

    if current_len > 0 {
        pieces.push(current);
    }
    pieces
}
