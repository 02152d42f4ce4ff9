// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Search gateway: retries, decoding and typed lookups.
//!
//! [`SearchGateway`] wraps a shared [`SearchBackend`] and the benchmark
//! results index pattern. Transient failures are retried with capped
//! exponential backoff; anything else is returned to the caller, which
//! decides whether it is fatal.

use benchscope_core::{ContainerMetricSet, JobConfig, MetricTarget, RunRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::SearchBackend;
use crate::envelope::{AggregationResponse, JobSummaryDoc, SearchResponse};
use crate::query::{self, RunQuery, CONTAINER_AGG};
use crate::{Result, SearchError};

/// Retry policy for transient search failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. At least 1.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on any single delay.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Job configuration lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSummaryLookup {
    /// Configuration of the first hit, if any.
    pub first: Option<JobConfig>,
    /// Number of hits returned.
    pub hits: usize,
}

/// Typed access to the benchmark results index.
#[derive(Clone)]
pub struct SearchGateway {
    backend: Arc<dyn SearchBackend>,
    index: String,
    retry: RetryPolicy,
}

impl SearchGateway {
    /// Create a gateway over `index` with the default retry policy.
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The index pattern queried.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Execute a body, retrying transient failures.
    pub async fn search_raw(&self, body: &Value) -> Result<Value> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.backend.search(&self.index, body).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        backoff_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient search failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Execute a body and decode the response into `T`.
    pub async fn search<T: DeserializeOwned>(&self, body: &Value) -> Result<T> {
        let raw = self.search_raw(body).await?;
        serde_json::from_value(raw).map_err(|e| SearchError::Decode(e.to_string()))
    }

    /// Runs matching the user's dimension filters, in backend order.
    pub async fn runs(&self, run_query: &RunQuery, size: usize) -> Result<Vec<RunRecord>> {
        let response: SearchResponse<RunRecord> = self.search(&run_query.to_body(size)).await?;
        Ok(response.into_sources())
    }

    /// Job summary documents for `uuid`; the first hit wins.
    pub async fn job_summary(&self, uuid: &str, size: usize) -> Result<JobSummaryLookup> {
        let response: SearchResponse<JobSummaryDoc> =
            self.search(&query::job_summary_body(uuid, size)).await?;
        let docs = response.into_sources();
        let hits = docs.len();
        if hits > 1 {
            debug!(uuid, hits, "Multiple jobSummary documents, using the first");
        }
        Ok(JobSummaryLookup {
            first: docs.into_iter().next().map(|d| d.job_config),
            hits,
        })
    }

    /// Per-container averages for one run and one target.
    pub async fn container_metrics(
        &self,
        uuid: &str,
        target: &MetricTarget,
        size: usize,
        bucket_size: usize,
    ) -> Result<ContainerMetricSet> {
        let body = query::container_metrics_body(uuid, target, size, bucket_size);
        let response: AggregationResponse = self.search(&body).await?;
        Ok(response.into_metric_set(CONTAINER_AGG, target.clone()))
    }

    /// Total documents in the index pattern.
    pub async fn count(&self) -> Result<u64> {
        let response: SearchResponse<Value> = self.search(&query::count_body()).await?;
        Ok(response.total().unwrap_or(0))
    }
}
