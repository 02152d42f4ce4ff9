// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Query-and-correlate pipeline.
//!
//! Runs the primary query, correlates every returned run under an overall
//! deadline, and returns the ordered outcomes with a [`BatchSummary`].

use benchscope_core::{BatchSummary, RunOutcome};
use benchscope_search::RunQuery;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{CollectorError, Correlator, Result};

/// Outcomes of one pipeline execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// One outcome per fetched run, in primary query order.
    pub outcomes: Vec<RunOutcome>,
    /// Counts and timing.
    pub summary: BatchSummary,
}

/// One-shot batch pipeline.
#[derive(Clone)]
pub struct Pipeline {
    correlator: Correlator,
    deadline: Option<Duration>,
}

impl Pipeline {
    /// Create a pipeline without a deadline.
    pub fn new(correlator: Correlator) -> Self {
        Self {
            correlator,
            deadline: None,
        }
    }

    /// Cancel in-flight correlation once `deadline` has elapsed.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Execute the pipeline.
    ///
    /// `cancel` may be triggered externally (e.g. on Ctrl-C); the batch then
    /// ends with [`CollectorError::Interrupted`]. The deadline cancels a child
    /// of it, so runs cut off by the deadline are reported as failed and the
    /// batch still succeeds.
    pub async fn run(&self, query: &RunQuery, cancel: &CancellationToken) -> Result<Batch> {
        let mut summary = BatchSummary::start();
        info!(
            execution_id = %summary.execution_id,
            platforms = ?query.platforms.values(),
            workloads = ?query.workloads.values(),
            version = %query.version,
            "Starting batch"
        );

        let runs = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Interrupted during run query");
                return Err(CollectorError::Interrupted);
            }
            runs = self.correlator.fetch_runs(query) => runs?,
        };

        let token = cancel.child_token();
        let watchdog = self.deadline.map(|deadline| {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                warn!(
                    deadline_secs = deadline.as_secs(),
                    "Deadline reached, cancelling in-flight runs"
                );
                token.cancel();
            })
        });

        let result = self.correlator.correlate_all(runs, &token).await;

        if let Some(handle) = watchdog {
            handle.abort();
        }
        if cancel.is_cancelled() {
            warn!("Interrupted during correlation");
            return Err(CollectorError::Interrupted);
        }
        let outcomes = result?;

        for outcome in &outcomes {
            summary.record(outcome);
        }
        summary.finish();

        info!(
            execution_id = %summary.execution_id,
            fetched = summary.fetched,
            accepted = summary.accepted,
            skipped = summary.total_skipped(),
            skipped_by_reason = ?summary.skipped,
            failed = summary.failed,
            duration_ms = summary.duration_ms.unwrap_or_default(),
            "Batch complete"
        );

        Ok(Batch { outcomes, summary })
    }
}
