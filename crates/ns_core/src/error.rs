use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    Generation(String),

    #[error("{0}")]
    Synthesis(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True for the categories whose message is meant for the caller.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::Extraction(_)
                | Error::Generation(_)
                | Error::Synthesis(_)
                | Error::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
