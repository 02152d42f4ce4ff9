// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark run data model.
//!
//! These types mirror the `_source` documents stored by kube-burner in the
//! search backend. Field names on the wire are kept through serde renames,
//! so a [`RunRecord`] decodes directly from a primary-query hit and a
//! [`JobConfig`] from the `jobConfig` object of a job summary document.
//!
//! ```text
//! CorrelatedRecord
//!   ├─ RunRecord            (primary query hit)
//!   ├─ JobConfig            (first jobSummary hit for the uuid)
//!   └─ ContainerMetricSet*  (one per non-empty namespace × metric aggregation)
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Completion status of a run that finished successfully.
pub const COMPLETE_STATUS: &str = "Complete";

/// One benchmark execution, decoded from a primary search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run identifier; empty when the document carries none.
    #[serde(default, deserialize_with = "null_default")]
    pub uuid: String,
    /// Start time as milliseconds since the Unix epoch.
    ///
    /// The backend stores this either as a number or as a numeric string.
    /// Values that cannot be parsed decode to `None`.
    #[serde(default, deserialize_with = "epoch_millis")]
    pub timestamp: Option<i64>,
    /// Workload name, e.g. `cluster-density`.
    #[serde(default, deserialize_with = "null_default")]
    pub workload: String,
    /// Platform name, e.g. `AWS`.
    #[serde(default, deserialize_with = "null_default")]
    pub platform: String,
    /// Cluster version string.
    #[serde(default, rename = "ocp_version", deserialize_with = "null_default")]
    pub version: String,
    /// Number of nodes in the cluster under test.
    #[serde(default, deserialize_with = "null_default")]
    pub total_nodes: u64,
    /// Completion status reported by the benchmark.
    #[serde(default, deserialize_with = "null_default")]
    pub result: String,
}

impl RunRecord {
    /// Whether the run finished with [`COMPLETE_STATUS`].
    pub fn is_complete(&self) -> bool {
        self.result == COMPLETE_STATUS
    }

    /// Whether the run carries a non-empty identifier.
    pub fn has_uuid(&self) -> bool {
        !self.uuid.is_empty()
    }

    /// Start time in UTC, if the timestamp is present and in range.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Start time rendered as RFC 3339 with second precision, or `unknown`.
    pub fn started_at_display(&self) -> String {
        self.timestamp
            .and_then(format_epoch_millis)
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Render milliseconds since the epoch as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_epoch_millis(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn epoch_millis<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(v)) => Some(v),
        Some(Raw::Float(v)) => Some(v as i64),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Decode `null` as the type's default, like a missing field.
pub fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Job configuration recorded in a run's `jobSummary` document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    /// Number of job iterations.
    #[serde(default, rename = "jobIterations", deserialize_with = "null_default")]
    pub iterations: u64,
    /// Whether churn was enabled.
    #[serde(default, deserialize_with = "null_default")]
    pub churn: bool,
    /// Percentage of objects churned per cycle.
    #[serde(default, deserialize_with = "null_default")]
    pub churn_percent: u64,
    /// Churn duration as stored by the benchmark.
    #[serde(default, deserialize_with = "null_default")]
    pub churn_duration: i64,
}

/// One `(namespace pattern, metric name)` pair to aggregate per run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricTarget {
    /// Namespace wildcard, e.g. `openshift-etcd`.
    pub namespace: String,
    /// Metric name wildcard, e.g. `containerCPU-Masters`.
    pub metric: String,
}

impl MetricTarget {
    /// Create a new target.
    pub fn new(namespace: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            metric: metric.into(),
        }
    }

    /// Cross product of namespaces and metrics, namespaces outermost.
    pub fn cross<N, M>(namespaces: &[N], metrics: &[M]) -> Vec<Self>
    where
        N: AsRef<str>,
        M: AsRef<str>,
    {
        namespaces
            .iter()
            .flat_map(|ns| {
                metrics
                    .iter()
                    .map(move |m| Self::new(ns.as_ref(), m.as_ref()))
            })
            .collect()
    }

    /// Targets used when no configuration overrides them.
    pub fn defaults() -> Vec<Self> {
        Self::cross(
            &[
                "openshift-etcd",
                "openshift-apiserver",
                "openshift-ovn-kubernetes",
            ],
            &["containerCPU-Masters"],
        )
    }
}

impl std::fmt::Display for MetricTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.metric)
    }
}

/// Average metric value for one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetric {
    /// Container name (aggregation bucket key).
    pub container: String,
    /// Average of the `value` field; `None` when the backend returned null.
    pub average: Option<f64>,
}

/// Container averages for one run, scoped to one [`MetricTarget`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetricSet {
    /// The target these buckets were aggregated for.
    pub target: MetricTarget,
    /// Buckets in backend order.
    pub containers: Vec<ContainerMetric>,
}

impl ContainerMetricSet {
    /// Whether no buckets were returned.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// A run joined with its job configuration and container metrics.
///
/// Only built by the correlator once a run passed every stage; never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedRecord {
    /// The primary run document.
    pub run: RunRecord,
    /// Job configuration from the first `jobSummary` hit.
    pub job: JobConfig,
    /// Non-empty metric groups, in target order.
    pub metrics: Vec<ContainerMetricSet>,
}

impl CorrelatedRecord {
    /// Assemble a record.
    pub fn new(run: RunRecord, job: JobConfig, metrics: Vec<ContainerMetricSet>) -> Self {
        Self { run, job, metrics }
    }

    /// Run identifier.
    pub fn uuid(&self) -> &str {
        &self.run.uuid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_record_decodes_string_timestamp() {
        let run: RunRecord = serde_json::from_value(json!({
            "uuid": "abc-123",
            "timestamp": "1700000000000",
            "workload": "cluster-density",
            "ocp_version": "4.12.3",
            "platform": "AWS",
            "total_nodes": 27,
            "result": "Complete"
        }))
        .unwrap();

        assert_eq!(run.uuid, "abc-123");
        assert_eq!(run.timestamp, Some(1_700_000_000_000));
        assert_eq!(run.version, "4.12.3");
        assert_eq!(run.total_nodes, 27);
        assert!(run.is_complete());
        assert!(run.has_uuid());
    }

    #[test]
    fn test_run_record_decodes_numeric_and_bad_timestamp() {
        let run: RunRecord =
            serde_json::from_value(json!({"uuid": "a", "timestamp": 1700000000000i64})).unwrap();
        assert_eq!(run.timestamp, Some(1_700_000_000_000));

        let run: RunRecord =
            serde_json::from_value(json!({"uuid": "a", "timestamp": "yesterday"})).unwrap();
        assert_eq!(run.timestamp, None);
        assert_eq!(run.started_at_display(), "unknown");
    }

    #[test]
    fn test_run_record_missing_fields_default() {
        let run: RunRecord = serde_json::from_value(json!({})).unwrap();
        assert!(!run.has_uuid());
        assert!(!run.is_complete());
        assert_eq!(run.timestamp, None);
    }

    #[test]
    fn test_run_record_null_fields_default() {
        let run: RunRecord = serde_json::from_value(json!({
            "uuid": null,
            "timestamp": null,
            "workload": null,
            "ocp_version": null,
            "platform": null,
            "total_nodes": null,
            "result": null
        }))
        .unwrap();
        assert_eq!(run, RunRecord::default());
    }

    #[test]
    fn test_run_record_non_numeric_timestamp_is_unknown() {
        for raw in [json!(true), json!({"ms": 1}), json!([1, 2])] {
            let run: RunRecord =
                serde_json::from_value(json!({"uuid": "a", "timestamp": raw})).unwrap();
            assert_eq!(run.timestamp, None);
            assert_eq!(run.started_at_display(), "unknown");
        }
    }

    #[test]
    fn test_job_config_null_fields_default() {
        let job: JobConfig = serde_json::from_value(json!({
            "jobIterations": 20,
            "churn": null,
            "churnPercent": null,
            "churnDuration": null
        }))
        .unwrap();
        assert_eq!(
            job,
            JobConfig {
                iterations: 20,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_timestamp_conversion() {
        assert_eq!(
            format_epoch_millis(1_700_000_000_000).as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
        let run = RunRecord {
            timestamp: Some(1_700_000_000_000),
            ..Default::default()
        };
        assert_eq!(run.started_at_display(), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_job_config_decodes_camel_case() {
        let job: JobConfig = serde_json::from_value(json!({
            "jobIterations": 50,
            "churn": true,
            "churnPercent": 10,
            "churnDuration": 3600
        }))
        .unwrap();
        assert_eq!(job.iterations, 50);
        assert!(job.churn);
        assert_eq!(job.churn_percent, 10);
        assert_eq!(job.churn_duration, 3600);

        let job: JobConfig = serde_json::from_value(json!({"jobIterations": 5})).unwrap();
        assert!(!job.churn);
    }

    #[test]
    fn test_default_targets_cross_product() {
        let targets = MetricTarget::defaults();
        assert_eq!(targets.len(), 3);
        assert_eq!(
            targets[0],
            MetricTarget::new("openshift-etcd", "containerCPU-Masters")
        );

        let crossed = MetricTarget::cross(&["a", "b"], &["x", "y"]);
        let labels: Vec<String> = crossed.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["a/x", "a/y", "b/x", "b/y"]);
    }
}
