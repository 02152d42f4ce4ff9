// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Errors that abort a whole batch.

use benchscope_search::SearchError;
use thiserror::Error;

/// Errors that stop the pipeline.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The primary run query failed
    #[error("Run query failed: {0}")]
    RunQuery(#[from] SearchError),

    /// A run failed while strict mode was enabled
    #[error("Run {uuid} failed: {error}")]
    RunFailed {
        /// Run identifier
        uuid: String,
        /// Failure message
        error: String,
    },

    /// The batch was cancelled from outside (e.g. Ctrl-C)
    #[error("Interrupted")]
    Interrupted,
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;
