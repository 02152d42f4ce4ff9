// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while talking to the search backend.

use thiserror::Error;

/// Errors that can occur during search operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The endpoint could not be parsed as a URL
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint {
        /// Endpoint as given
        endpoint: String,
        /// Parser message
        reason: String,
    },

    /// The HTTP client could not be built
    #[error("Unable to build search client: {0}")]
    Client(String),

    /// The request never produced a response
    #[error("Transport error: {message}")]
    Transport {
        /// Client error message
        message: String,
        /// Whether the failure was a connect error or a timeout
        transient: bool,
    },

    /// The backend answered with a non-success status
    #[error("Search failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The response body did not match the expected envelope
    #[error("Malformed search response: {0}")]
    Decode(String),
}

impl SearchError {
    /// Whether retrying the same request may succeed.
    ///
    /// Connection failures, timeouts and 429/502/503/504 responses are
    /// transient; everything else is not.
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::Transport { transient, .. } => *transient,
            SearchError::Status { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return SearchError::Decode(err.to_string());
        }
        SearchError::Transport {
            transient: err.is_timeout() || err.is_connect(),
            message: err.to_string(),
        }
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
