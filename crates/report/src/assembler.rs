// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Report assembly.
//!
//! Keeps accepted records in the order their runs were fetched; skipped and
//! failed runs are accounted for in the batch summary only.

use benchscope_core::{BatchSummary, CorrelatedRecord, RunOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Consolidated report for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Batch counts and timing, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<BatchSummary>,
    /// Accepted records, in primary query order.
    pub records: Vec<CorrelatedRecord>,
}

impl Report {
    /// Collect the accepted records from `outcomes`, preserving order.
    pub fn assemble(outcomes: impl IntoIterator<Item = RunOutcome>) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: None,
            records: outcomes
                .into_iter()
                .filter_map(RunOutcome::into_record)
                .collect(),
        }
    }

    /// Attach the batch summary.
    pub fn with_summary(mut self, summary: BatchSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Whether no record was accepted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of accepted records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
