// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-run correlation.
//!
//! Each run walks `Fetched -> Validated -> JobJoined -> MetricsJoined ->
//! Accepted` and leaves with a [`RunOutcome`]. Runs share no state, so the
//! correlator can process several of them at once over a bounded pool while
//! still yielding outcomes in input order.

use benchscope_core::{
    CorrelatedRecord, MetricTarget, RunOutcome, RunRecord, Settings, SkipReason,
};
use benchscope_search::{RunQuery, SearchError, SearchGateway};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::{CollectorError, Result};

/// Correlation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatorConfig {
    /// Namespace and metric pairs aggregated per run, in query order.
    pub targets: Vec<MetricTarget>,
    /// Join container metrics; when false runs are accepted after the job join.
    pub include_metrics: bool,
    /// Hits requested by the run and job summary queries.
    pub page_size: usize,
    /// Buckets requested per aggregation.
    pub bucket_size: usize,
    /// Raw hits returned with each aggregation.
    pub metric_hits_size: usize,
    /// Runs correlated concurrently.
    pub concurrency: usize,
    /// Abort on the first failed run.
    pub strict: bool,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        CorrelatorConfig::from(&Settings::default())
    }
}

impl From<&Settings> for CorrelatorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            targets: settings.targets.clone(),
            include_metrics: settings.include_metrics,
            page_size: settings.page_size,
            bucket_size: settings.bucket_size,
            metric_hits_size: settings.metric_hits_size,
            concurrency: settings.concurrency,
            strict: settings.strict,
        }
    }
}

/// Joins runs with their job summaries and container metrics.
#[derive(Clone)]
pub struct Correlator {
    gateway: SearchGateway,
    config: CorrelatorConfig,
}

impl Correlator {
    /// Create a correlator over a gateway.
    pub fn new(gateway: SearchGateway, config: CorrelatorConfig) -> Self {
        Self { gateway, config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &CorrelatorConfig {
        &self.config
    }

    /// Execute the primary query. Any failure here is fatal for the batch.
    pub async fn fetch_runs(&self, query: &RunQuery) -> Result<Vec<RunRecord>> {
        let runs = self.gateway.runs(query, self.config.page_size).await?;
        info!(count = runs.len(), "Found {} results", runs.len());
        Ok(runs)
    }

    /// Correlate one run.
    ///
    /// Search failures are folded into [`RunOutcome::Failed`]; this never
    /// returns an error.
    pub async fn correlate(&self, run: RunRecord) -> RunOutcome {
        let uuid = run.uuid.clone();
        let span = info_span!("correlate", uuid = %uuid);

        async move {
            match self.correlate_run(run).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(error = %err, "Search failed, dropping run");
                    RunOutcome::failed(uuid, err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn correlate_run(&self, run: RunRecord) -> std::result::Result<RunOutcome, SearchError> {
        // Validated
        if !run.is_complete() {
            warn!(result = %run.result, "UUID {} resulted in {}", run.uuid, run.result);
            return Ok(RunOutcome::skipped(
                run.uuid,
                SkipReason::NotComplete { status: run.result },
            ));
        }
        if !run.has_uuid() {
            warn!("Missing UUID, skipping");
            return Ok(RunOutcome::skipped(run.uuid, SkipReason::MissingUuid));
        }

        // JobJoined
        info!("Searching UUID {}", run.uuid);
        let lookup = self
            .gateway
            .job_summary(&run.uuid, self.config.page_size)
            .await?;
        let Some(job) = lookup.first else {
            warn!("Job {} missing jobSummary", run.uuid);
            return Ok(RunOutcome::skipped(run.uuid, SkipReason::MissingJobSummary));
        };
        info!(
            started_at = %run.started_at_display(),
            nodes = run.total_nodes,
            iterations = job.iterations,
            churn = job.churn,
            "Job summary joined"
        );

        if !self.config.include_metrics {
            return Ok(RunOutcome::Accepted(CorrelatedRecord::new(
                run,
                job,
                Vec::new(),
            )));
        }

        // MetricsJoined
        let mut metrics = Vec::new();
        for target in &self.config.targets {
            let set = self
                .gateway
                .container_metrics(
                    &run.uuid,
                    target,
                    self.config.metric_hits_size,
                    self.config.bucket_size,
                )
                .await?;
            if set.is_empty() {
                debug!(metric_target = %target, "No container buckets");
                continue;
            }
            debug!(metric_target = %target, containers = set.containers.len(), "Container buckets joined");
            metrics.push(set);
        }

        if metrics.is_empty() {
            warn!("Job {} has no container metrics, dropping", run.uuid);
            return Ok(RunOutcome::skipped(run.uuid, SkipReason::NoMetricBuckets));
        }

        // Accepted
        Ok(RunOutcome::Accepted(CorrelatedRecord::new(run, job, metrics)))
    }

    /// Correlate `runs` over a pool of `concurrency` workers.
    ///
    /// Outcomes come back in the order of `runs`. Cancelling `cancel` fails
    /// every run still in flight. In strict mode the first failed run cancels
    /// the rest and is returned as an error.
    pub async fn correlate_all(
        &self,
        runs: Vec<RunRecord>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RunOutcome>> {
        let concurrency = self.config.concurrency.max(1);
        let mut outcomes = Vec::with_capacity(runs.len());

        let mut pending = stream::iter(runs)
            .map(|run| {
                let cancel = cancel.clone();
                async move {
                    let uuid = run.uuid.clone();
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            warn!(uuid = %uuid, "Correlation cancelled");
                            RunOutcome::failed(uuid, "correlation cancelled")
                        }
                        outcome = self.correlate(run) => outcome,
                    }
                }
            })
            .buffered(concurrency);

        while let Some(outcome) = pending.next().await {
            if self.config.strict {
                if let RunOutcome::Failed { uuid, error } = &outcome {
                    cancel.cancel();
                    return Err(CollectorError::RunFailed {
                        uuid: uuid.clone(),
                        error: error.clone(),
                    });
                }
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
