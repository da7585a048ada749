//! Errors raised by the web action adapters

use thiserror::Error;

/// Failure of a remote lookup.
///
/// The collapsing adapter entry points fold every variant into one fallback
/// outcome; the `try_*` entry points return these as-is.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no results for {0:?}")]
    Empty(String),
}
