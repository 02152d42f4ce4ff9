// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed views of search responses.
//!
//! Only the parts of the response the pipeline reads are modelled; unknown
//! fields are ignored. A response missing `hits` (or `aggregations` for an
//! aggregation query) is treated as malformed.

use benchscope_core::model::null_default;
use benchscope_core::{ContainerMetric, ContainerMetricSet, JobConfig, MetricTarget};
use serde::Deserialize;
use std::collections::HashMap;

/// `hits` section of a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<T> {
    /// Matching documents.
    pub hits: HitList<T>,
}

impl<T> SearchResponse<T> {
    /// Decoded `_source` documents in response order.
    pub fn into_sources(self) -> Vec<T> {
        self.hits.hits.into_iter().map(|h| h.source).collect()
    }

    /// Total hits reported by the backend, if present.
    pub fn total(&self) -> Option<u64> {
        self.hits.total.as_ref().map(HitsTotal::value)
    }
}

/// `hits.hits` plus the reported total.
#[derive(Debug, Clone, Deserialize)]
pub struct HitList<T> {
    /// Total hit count.
    #[serde(default)]
    pub total: Option<HitsTotal>,
    /// Returned hits.
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

/// One hit.
#[derive(Debug, Clone, Deserialize)]
pub struct Hit<T> {
    /// The stored document.
    #[serde(rename = "_source")]
    pub source: T,
}

/// Total hit count, either `{"value": n, ...}` or a bare number.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum HitsTotal {
    /// Elasticsearch 7+ / OpenSearch form.
    Object {
        /// Hit count.
        value: u64,
    },
    /// Legacy form.
    Count(u64),
}

impl HitsTotal {
    /// The hit count.
    pub fn value(&self) -> u64 {
        match self {
            HitsTotal::Object { value } => *value,
            HitsTotal::Count(n) => *n,
        }
    }
}

/// `_source` of a job summary document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSummaryDoc {
    /// Run identifier.
    #[serde(default, deserialize_with = "null_default")]
    pub uuid: String,
    /// Job configuration.
    #[serde(default, rename = "jobConfig", deserialize_with = "null_default")]
    pub job_config: JobConfig,
}

/// `aggregations` section of a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationResponse {
    /// Terms aggregations keyed by name.
    pub aggregations: HashMap<String, TermsAggregation>,
}

impl AggregationResponse {
    /// Buckets of the named aggregation; empty when it is absent.
    pub fn buckets(&self, name: &str) -> &[ContainerBucket] {
        self.aggregations
            .get(name)
            .map(|agg| agg.buckets.as_slice())
            .unwrap_or(&[])
    }

    /// Convert the named aggregation into a metric set for `target`.
    pub fn into_metric_set(mut self, name: &str, target: MetricTarget) -> ContainerMetricSet {
        let containers = self
            .aggregations
            .remove(name)
            .map(|agg| agg.buckets)
            .unwrap_or_default()
            .into_iter()
            .map(ContainerBucket::into_metric)
            .collect();

        ContainerMetricSet { target, containers }
    }
}

/// A terms aggregation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermsAggregation {
    /// Buckets in backend order.
    #[serde(default)]
    pub buckets: Vec<ContainerBucket>,
}

/// One container bucket with its nested average.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerBucket {
    /// Container name.
    pub key: String,
    /// Documents in the bucket.
    #[serde(default)]
    pub doc_count: u64,
    /// Nested average aggregation.
    #[serde(default)]
    pub avgvalue: AvgValue,
}

impl ContainerBucket {
    fn into_metric(self) -> ContainerMetric {
        ContainerMetric {
            container: self.key,
            average: self.avgvalue.value,
        }
    }
}

/// Result of an `avg` aggregation; `null` when no document had a value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AvgValue {
    /// Average value.
    #[serde(default)]
    pub value: Option<f64>,
}
