// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scripted in-memory search backend for pipeline tests.
//!
//! Requests are routed by body shape: bodies with `aggs` are container
//! aggregations, bodies filtering on a `uuid` phrase are job summary lookups,
//! anything else is the primary run query.

use async_trait::async_trait;
use benchscope_search::{SearchBackend, SearchError};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Runs,
    JobSummary(String),
    Metrics { uuid: String, namespace: String },
}

#[derive(Default)]
pub struct FakeBackend {
    runs: Vec<Value>,
    job_summaries: HashMap<String, Vec<Value>>,
    buckets: HashMap<(String, String), Vec<Value>>,
    failing_runs: bool,
    runs_delay: Option<Duration>,
    failing_uuids: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(Call, Option<u64>)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, uuid: &str, result: &str) -> Self {
        self.runs.push(json!({
            "uuid": uuid,
            "timestamp": "1700000000000",
            "workload": "cluster-density",
            "ocp_version": "4.12.3",
            "platform": "AWS",
            "total_nodes": 27,
            "result": result
        }));
        self
    }

    pub fn raw_run(mut self, source: Value) -> Self {
        self.runs.push(source);
        self
    }

    pub fn runs_delay(mut self, delay: Duration) -> Self {
        self.runs_delay = Some(delay);
        self
    }

    pub fn job_summary(mut self, uuid: &str, iterations: u64, churn: bool) -> Self {
        self.job_summaries
            .entry(uuid.to_string())
            .or_default()
            .push(json!({
                "uuid": uuid,
                "metricName": "jobSummary",
                "jobConfig": {"jobIterations": iterations, "churn": churn}
            }));
        self
    }

    pub fn bucket(mut self, uuid: &str, namespace: &str, container: &str, avg: f64) -> Self {
        self.buckets
            .entry((uuid.to_string(), namespace.to_string()))
            .or_default()
            .push(json!({"key": container, "doc_count": 10, "avgvalue": {"value": avg}}));
        self
    }

    pub fn failing_runs(mut self) -> Self {
        self.failing_runs = true;
        self
    }

    pub fn failing(mut self, uuid: &str) -> Self {
        self.failing_uuids.insert(uuid.to_string());
        self
    }

    pub fn delay(mut self, uuid: &str, delay: Duration) -> Self {
        self.delays.insert(uuid.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.sizes().into_iter().map(|(call, _)| call).collect()
    }

    /// Calls paired with the `size` of their request body.
    pub fn sizes(&self) -> Vec<(Call, Option<u64>)> {
        self.calls.lock().unwrap().clone()
    }

    fn route(body: &Value) -> Call {
        if body.get("aggs").is_some() {
            let query = &body["query"]["bool"];
            return Call::Metrics {
                uuid: query["must"][0]["match"]["uuid.keyword"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
                namespace: query["filter"][0]["wildcard"]["labels.namespace.keyword"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
            };
        }
        match body["query"]["bool"]["filter"][1]["match_phrase"]["uuid"].as_str() {
            Some(uuid) => Call::JobSummary(uuid.to_string()),
            None => Call::Runs,
        }
    }

    fn unavailable() -> SearchError {
        SearchError::Status {
            status: 500,
            body: "internal_server_error".into(),
        }
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search(&self, _index: &str, body: &Value) -> benchscope_search::Result<Value> {
        let call = Self::route(body);
        self.calls
            .lock()
            .unwrap()
            .push((call.clone(), body["size"].as_u64()));

        match call {
            Call::Runs => {
                if let Some(delay) = self.runs_delay {
                    tokio::time::sleep(delay).await;
                }
                if self.failing_runs {
                    return Err(Self::unavailable());
                }
                let hits: Vec<Value> = self.runs.iter().map(|r| json!({"_source": r})).collect();
                Ok(json!({"hits": {"total": {"value": hits.len()}, "hits": hits}}))
            }
            Call::JobSummary(uuid) => {
                if let Some(delay) = self.delays.get(&uuid) {
                    tokio::time::sleep(*delay).await;
                }
                if self.failing_uuids.contains(&uuid) {
                    return Err(Self::unavailable());
                }
                let hits: Vec<Value> = self
                    .job_summaries
                    .get(&uuid)
                    .map(|docs| docs.iter().map(|d| json!({"_source": d})).collect())
                    .unwrap_or_default();
                Ok(json!({"hits": {"hits": hits}}))
            }
            Call::Metrics { uuid, namespace } => {
                let buckets = self
                    .buckets
                    .get(&(uuid, namespace))
                    .cloned()
                    .unwrap_or_default();
                Ok(json!({
                    "hits": {"hits": []},
                    "aggregations": {"labels.container": {"buckets": buckets}}
                }))
            }
        }
    }
}
