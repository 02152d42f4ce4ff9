// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Query bodies in the backend's query DSL.
//!
//! Three queries drive the pipeline:
//!
//! ```text
//! run filter       bool.filter = [ platform OR-clause,
//!                                  workload OR-clause,
//!                                  query_string "ocp_version == <pattern>" ]
//! job summary      bool.filter = [ metricName ~ jobSummary, uuid phrase ]
//! container agg    bool.filter = [ namespace wildcard, metricName wildcard ]
//!                  bool.must   = [ uuid.keyword match ]
//!                  aggs        = terms(labels.container.keyword) -> avg(value)
//! ```
//!
//! Building a body never fails: dimension values are validated when the
//! [`DimensionFilter`] and [`VersionPattern`] are constructed. Values are
//! passed through untouched; the backend's phrase matching is the only
//! escaping applied.

use benchscope_core::{DimensionFilter, MetricTarget, VersionPattern};
use serde_json::{json, Map, Value};

/// Metric name tag carried by job summary documents.
pub const JOB_SUMMARY_METRIC: &str = "jobSummary";

/// Name of the terms aggregation over container names.
pub const CONTAINER_AGG: &str = "labels.container";

/// Name of the nested average aggregation.
pub const AVG_AGG: &str = "avgvalue";

/// Keyword field aggregated into container buckets.
pub const CONTAINER_FIELD: &str = "labels.container.keyword";

/// Numeric field averaged per container.
pub const VALUE_FIELD: &str = "value";

/// User selection for the primary run query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunQuery {
    /// Accepted platforms.
    pub platforms: DimensionFilter,
    /// Accepted workloads.
    pub workloads: DimensionFilter,
    /// Version expression.
    pub version: VersionPattern,
}

impl RunQuery {
    /// Create a new run query.
    pub fn new(
        platforms: DimensionFilter,
        workloads: DimensionFilter,
        version: VersionPattern,
    ) -> Self {
        Self {
            platforms,
            workloads,
            version,
        }
    }

    /// Boolean filter: `platform ∈ P AND workload ∈ W AND version ~ pattern`.
    pub fn to_filter(&self) -> Value {
        json!({
            "bool": {
                "filter": [
                    any_of(&self.platforms),
                    any_of(&self.workloads),
                    { "query_string": { "query": self.version.to_query_string() } }
                ]
            }
        })
    }

    /// Full request body returning at most `size` hits.
    pub fn to_body(&self, size: usize) -> Value {
        json!({
            "size": size,
            "query": self.to_filter()
        })
    }
}

/// OR-composition of exact phrase matches on one keyword field.
fn any_of(filter: &DimensionFilter) -> Value {
    let clauses: Vec<Value> = filter
        .values()
        .iter()
        .map(|v| field_clause("match_phrase", filter.field(), v))
        .collect();

    json!({
        "bool": {
            "should": clauses,
            "minimum_should_match": 1
        }
    })
}

/// `{ kind: { field: value } }`
fn field_clause(kind: &str, field: &str, value: &str) -> Value {
    let mut inner = Map::new();
    inner.insert(field.to_string(), Value::from(value));
    let mut outer = Map::new();
    outer.insert(kind.to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// Job summary lookup for one run.
pub fn job_summary_body(uuid: &str, size: usize) -> Value {
    json!({
        "size": size,
        "query": {
            "bool": {
                "must": [],
                "filter": [
                    {
                        "bool": {
                            "should": [ { "match": { "metricName": JOB_SUMMARY_METRIC } } ],
                            "minimum_should_match": 1
                        }
                    },
                    field_clause("match_phrase", "uuid", uuid)
                ]
            }
        }
    })
}

/// Per-container average of `value` for one run and one target.
pub fn container_metrics_body(
    uuid: &str,
    target: &MetricTarget,
    size: usize,
    bucket_size: usize,
) -> Value {
    json!({
        "size": size,
        "query": {
            "bool": {
                "filter": [
                    field_clause("wildcard", "labels.namespace.keyword", &target.namespace),
                    field_clause("wildcard", "metricName.keyword", &target.metric)
                ],
                "must": [ field_clause("match", "uuid.keyword", uuid) ]
            }
        },
        "aggs": {
            CONTAINER_AGG: {
                "terms": { "field": CONTAINER_FIELD, "size": bucket_size },
                "aggs": {
                    AVG_AGG: { "avg": { "field": VALUE_FIELD } }
                }
            }
        }
    })
}

/// Match-all query that only reports the total hit count.
pub fn count_body() -> Value {
    json!({
        "size": 0,
        "track_total_hits": true,
        "query": { "match_all": {} }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(platforms: &str, workloads: &str) -> RunQuery {
        RunQuery::new(
            DimensionFilter::platforms(platforms).unwrap(),
            DimensionFilter::workloads(workloads).unwrap(),
            VersionPattern::new("4.12*").unwrap(),
        )
    }

    #[test]
    fn test_single_values_nest_under_one_and() {
        let body = query("AWS", "cluster-density").to_body(10_000);
        assert_eq!(body["size"], 10_000);

        let filter = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 3);
        assert_eq!(
            filter[0],
            json!({"bool": {
                "should": [{"match_phrase": {"platform.keyword": "AWS"}}],
                "minimum_should_match": 1
            }})
        );
        assert_eq!(
            filter[1]["bool"]["should"][0],
            json!({"match_phrase": {"benchmark.keyword": "cluster-density"}})
        );
        assert_eq!(
            filter[2],
            json!({"query_string": {"query": "ocp_version == 4.12*"}})
        );
    }

    #[test]
    fn test_structure_independent_of_list_length() {
        for (platforms, workloads) in [
            ("AWS", "cluster-density"),
            ("AWS,ROSA", "node-density"),
            ("AWS,ROSA,GCP,Azure", "cluster-density,node-density,node-density-heavy"),
        ] {
            let q = query(platforms, workloads);
            let filter = q.to_filter();
            let clauses = filter["bool"]["filter"].as_array().unwrap();
            assert_eq!(clauses.len(), 3);
            assert!(filter["bool"].get("should").is_none());

            let p = clauses[0]["bool"]["should"].as_array().unwrap();
            let w = clauses[1]["bool"]["should"].as_array().unwrap();
            assert_eq!(p.len(), q.platforms.values().len());
            assert_eq!(w.len(), q.workloads.values().len());
            assert_eq!(clauses[0]["bool"]["minimum_should_match"], 1);
            assert_eq!(clauses[1]["bool"]["minimum_should_match"], 1);

            for (clause, value) in p.iter().zip(q.platforms.values()) {
                assert_eq!(clause["match_phrase"]["platform.keyword"], *value);
            }
        }
    }

    #[test]
    fn test_values_are_not_escaped() {
        let q = query("AWS \"quoted\"", "cluster-density");
        let body = q.to_body(1);
        assert_eq!(
            body["query"]["bool"]["filter"][0]["bool"]["should"][0]["match_phrase"]
                ["platform.keyword"],
            "AWS \"quoted\""
        );
    }

    #[test]
    fn test_job_summary_body() {
        let body = job_summary_body("abc-123", 10_000);
        let filter = &body["query"]["bool"]["filter"];
        assert_eq!(
            filter[0]["bool"]["should"][0]["match"]["metricName"],
            "jobSummary"
        );
        assert_eq!(filter[1], json!({"match_phrase": {"uuid": "abc-123"}}));
    }

    #[test]
    fn test_container_metrics_body() {
        let target = MetricTarget::new("openshift-etcd", "containerCPU-Masters");
        let body = container_metrics_body("abc-123", &target, 10_000, 500);

        let filter = &body["query"]["bool"]["filter"];
        assert_eq!(
            filter[0],
            json!({"wildcard": {"labels.namespace.keyword": "openshift-etcd"}})
        );
        assert_eq!(
            filter[1],
            json!({"wildcard": {"metricName.keyword": "containerCPU-Masters"}})
        );
        assert_eq!(
            body["query"]["bool"]["must"][0],
            json!({"match": {"uuid.keyword": "abc-123"}})
        );

        let agg = &body["aggs"]["labels.container"];
        assert_eq!(agg["terms"]["field"], "labels.container.keyword");
        assert_eq!(agg["terms"]["size"], 500);
        assert_eq!(agg["aggs"]["avgvalue"]["avg"]["field"], "value");
    }
}
