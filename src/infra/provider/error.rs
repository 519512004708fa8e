//! Error types for the provider gateway.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the item provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Every attempt failed; carries the last cause.
    #[error("fetch failed after {attempts} attempt(s): {cause}")]
    FetchFailed {
        /// Number of attempts made
        attempts: u32,
        /// Last underlying failure
        cause: String,
    },

    /// The whole fetch, retries included, ran past its deadline.
    #[error("fetch exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    /// The provider answered but the body was not what we expected.
    #[error("invalid provider response: {0}")]
    Decode(String),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
