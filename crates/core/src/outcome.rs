// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-run correlation outcomes and the batch summary.
//!
//! Every run fetched by the primary query ends in exactly one
//! [`RunOutcome`]. Skips are expected (incomplete runs, missing job
//! summaries, no metric buckets) and never stop the batch; failures carry the
//! search error that interrupted the run.
//!
//! # Stages
//!
//! ```text
//! Fetched -> Validated -> JobJoined -> MetricsJoined -> Accepted
//!               │             │             │
//!               └── skipped ──┴── skipped ──┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::model::CorrelatedRecord;

/// Position of a run in the correlation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Decoded from the primary query.
    Fetched,
    /// Status and identifier checked.
    Validated,
    /// Job summary attached.
    JobJoined,
    /// Metric aggregations attached.
    MetricsJoined,
    /// Added to the report.
    Accepted,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Fetched => "fetched",
            Stage::Validated => "validated",
            Stage::JobJoined => "job_joined",
            Stage::MetricsJoined => "metrics_joined",
            Stage::Accepted => "accepted",
        };
        f.write_str(s)
    }
}

/// Why a run was left out of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The run did not finish with status `Complete`.
    NotComplete {
        /// Status the run reported.
        status: String,
    },
    /// The run document has no identifier.
    MissingUuid,
    /// No `jobSummary` document matched the run.
    MissingJobSummary,
    /// Every metric aggregation came back without buckets.
    NoMetricBuckets,
}

impl SkipReason {
    /// Stage at which a run with this reason is dropped.
    pub fn stage(&self) -> Stage {
        match self {
            SkipReason::NotComplete { .. } | SkipReason::MissingUuid => Stage::Validated,
            SkipReason::MissingJobSummary => Stage::JobJoined,
            SkipReason::NoMetricBuckets => Stage::MetricsJoined,
        }
    }

    /// Short label used for grouping in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::NotComplete { .. } => "not_complete",
            SkipReason::MissingUuid => "missing_uuid",
            SkipReason::MissingJobSummary => "missing_job_summary",
            SkipReason::NoMetricBuckets => "no_metric_buckets",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotComplete { status } => write!(f, "run resulted in {:?}", status),
            SkipReason::MissingUuid => f.write_str("missing uuid"),
            SkipReason::MissingJobSummary => f.write_str("missing jobSummary"),
            SkipReason::NoMetricBuckets => f.write_str("no metric buckets"),
        }
    }
}

/// Result of correlating one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The run passed every stage.
    Accepted(CorrelatedRecord),
    /// The run was dropped for an expected reason.
    Skipped {
        /// Run identifier (may be empty).
        uuid: String,
        /// Why it was dropped.
        #[serde(flatten)]
        reason: SkipReason,
    },
    /// A search against the backend failed while correlating the run.
    Failed {
        /// Run identifier.
        uuid: String,
        /// Rendered error.
        error: String,
    },
}

impl RunOutcome {
    /// Skip a run.
    pub fn skipped(uuid: impl Into<String>, reason: SkipReason) -> Self {
        RunOutcome::Skipped {
            uuid: uuid.into(),
            reason,
        }
    }

    /// Fail a run.
    pub fn failed(uuid: impl Into<String>, error: impl ToString) -> Self {
        RunOutcome::Failed {
            uuid: uuid.into(),
            error: error.to_string(),
        }
    }

    /// Identifier of the run this outcome belongs to.
    pub fn uuid(&self) -> &str {
        match self {
            RunOutcome::Accepted(record) => record.uuid(),
            RunOutcome::Skipped { uuid, .. } | RunOutcome::Failed { uuid, .. } => uuid,
        }
    }

    /// Whether the run made it into the report.
    pub fn is_accepted(&self) -> bool {
        matches!(self, RunOutcome::Accepted(_))
    }

    /// Whether the run failed with a search error.
    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }

    /// The accepted record, if any.
    pub fn into_record(self) -> Option<CorrelatedRecord> {
        match self {
            RunOutcome::Accepted(record) => Some(record),
            _ => None,
        }
    }
}

/// Counts and timing for one pipeline execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Identifier of this execution (UUID v4).
    pub execution_id: Uuid,
    /// When the batch started.
    pub start_time: DateTime<Utc>,
    /// When the batch finished; unset while running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Duration in milliseconds (computed from start/end).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Runs returned by the primary query.
    pub fetched: usize,
    /// Runs accepted into the report.
    pub accepted: usize,
    /// Skipped runs keyed by [`SkipReason::label`].
    #[serde(default)]
    pub skipped: BTreeMap<String, usize>,
    /// Runs that failed with a search error.
    pub failed: usize,
}

impl BatchSummary {
    /// Start a new summary now.
    pub fn start() -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            start_time: Utc::now(),
            end_time: None,
            duration_ms: None,
            fetched: 0,
            accepted: 0,
            skipped: BTreeMap::new(),
            failed: 0,
        }
    }

    /// Count one outcome.
    pub fn record(&mut self, outcome: &RunOutcome) {
        self.fetched += 1;
        match outcome {
            RunOutcome::Accepted(_) => self.accepted += 1,
            RunOutcome::Skipped { reason, .. } => {
                *self.skipped.entry(reason.label().to_string()).or_insert(0) += 1;
            }
            RunOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Mark the batch finished, setting end time and duration.
    pub fn finish(&mut self) {
        let now = Utc::now();
        self.end_time = Some(now);
        self.duration_ms = Some(
            now.signed_duration_since(self.start_time)
                .num_milliseconds()
                .unsigned_abs(),
        );
    }

    /// Total skipped runs across all reasons.
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}
