// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Layered settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults ([`Settings::default`], applied per missing field)
//! 2. an optional TOML file (`benchscope.toml`, or an explicit path)
//! 3. environment variables prefixed with `BENCHSCOPE_`, nested keys joined
//!    with `__` (e.g. `BENCHSCOPE_RETRY__MAX_ATTEMPTS=5`)
//!
//! The backend endpoint itself comes from `ES_URL` and is resolved by
//! [`resolve_endpoint`]; command-line flags are applied on top by the CLI.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::model::MetricTarget;
use crate::{Error, Result};

/// Environment variable holding the search backend endpoint.
pub const ES_URL_ENV: &str = "ES_URL";

/// Default settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "benchscope.toml";

/// Prefix for settings read from the environment.
pub const ENV_PREFIX: &str = "BENCHSCOPE";

/// Upper bound on hits returned per query.
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Retry behaviour for transient search failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts per request, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound on the delay between attempts, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
        }
    }
}

/// Settings for one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Index pattern holding benchmark results.
    pub index_pattern: String,
    /// Hits requested by the run and job summary queries (capped at
    /// [`MAX_PAGE_SIZE`]).
    pub page_size: usize,
    /// Buckets requested per container aggregation.
    pub bucket_size: usize,
    /// Raw hits returned alongside each container aggregation; 0 skips them.
    pub metric_hits_size: usize,
    /// Namespace and metric pairs aggregated per run.
    pub targets: Vec<MetricTarget>,
    /// Whether to join container metrics at all.
    pub include_metrics: bool,
    /// Runs correlated concurrently.
    pub concurrency: usize,
    /// Overall deadline for the correlation phase, in seconds.
    pub deadline_secs: u64,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Abort the batch on the first failed run.
    pub strict: bool,
    /// Accept self-signed backend certificates.
    pub accept_invalid_certs: bool,
    /// Retry policy for transient failures.
    pub retry: RetrySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_pattern: "ripsaw-kube-burner*".to_string(),
            page_size: MAX_PAGE_SIZE,
            bucket_size: MAX_PAGE_SIZE,
            metric_hits_size: MAX_PAGE_SIZE,
            targets: MetricTarget::defaults(),
            include_metrics: true,
            concurrency: 4,
            deadline_secs: 300,
            request_timeout_secs: 30,
            strict: false,
            accept_invalid_certs: false,
            retry: RetrySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, a settings file and the environment.
    ///
    /// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()
    }

    /// Check invariants and clamp sizes to [`MAX_PAGE_SIZE`].
    pub fn validate(mut self) -> Result<Self> {
        if self.index_pattern.trim().is_empty() {
            return Err(Error::invalid_input("index_pattern cannot be empty"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_input("page_size must be at least 1"));
        }
        if self.concurrency == 0 {
            return Err(Error::invalid_input("concurrency must be at least 1"));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::invalid_input("retry.max_attempts must be at least 1"));
        }
        if self.include_metrics && self.targets.is_empty() {
            return Err(Error::invalid_input(
                "at least one metric target is required when metrics are included",
            ));
        }
        self.page_size = self.page_size.min(MAX_PAGE_SIZE);
        self.bucket_size = self.bucket_size.min(MAX_PAGE_SIZE);
        self.metric_hits_size = self.metric_hits_size.min(MAX_PAGE_SIZE);
        Ok(self)
    }

    /// Overall correlation deadline.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Resolve the backend endpoint from an explicit value or `ES_URL`.
///
/// Unset and empty values are both configuration errors.
pub fn resolve_endpoint(explicit: Option<&str>) -> Result<String> {
    let raw = match explicit {
        Some(v) => v.to_string(),
        None => std::env::var(ES_URL_ENV).unwrap_or_default(),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::missing_config(format!(
            "{} env var cannot be empty",
            ES_URL_ENV
        )));
    }
    Ok(trimmed.to_string())
}
