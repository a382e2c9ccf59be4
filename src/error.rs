use std::io;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the page fetch. Never carried together with candidates.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to fetch video (upstream answered {status})")]
    Upstream { status: StatusCode },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl ExtractError {
    /// Status to answer the caller with: the upstream one, otherwise 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractError::Upstream { status } => *status,
            ExtractError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Network response was not ok ({0})")]
    Status(StatusCode),
    #[error("Failed to download video: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to write video: {0}")]
    Io(#[from] io::Error),
}
