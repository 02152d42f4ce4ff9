// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by the core crate.

use thiserror::Error;

/// Errors raised while validating user input or loading settings.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user-supplied value (empty dimension list, empty pattern, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required setting is missing or empty.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Settings could not be loaded or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Build an [`Error::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Build an [`Error::MissingConfig`].
    pub fn missing_config(msg: impl Into<String>) -> Self {
        Error::MissingConfig(msg.into())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
