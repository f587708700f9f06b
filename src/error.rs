//! Error types shared across the crate.

use std::io;

use thiserror::Error;

/// Errors emitted while talking to the trivia service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("no questions available for this query")]
    NoResults,
    #[error("the trivia service rejected the request parameters")]
    InvalidParameter,
    #[error("session token not found")]
    TokenNotFound,
    #[error("session token has returned every available question")]
    TokenEmpty,
    #[error("rate limited by the trivia service")]
    RateLimited,
    #[error("gave up after {0} retries")]
    RetriesExhausted(u32),
    #[error("unexpected response code {0}")]
    UnknownCode(u8),
    #[error("token response did not contain a token")]
    MissingToken,
    #[error("trivia request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the local key/value store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("store io failed: {0}")]
    Io(#[from] io::Error),
    #[error("store contents are not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for running the quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
