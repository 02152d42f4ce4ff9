// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fixed-column console table.
//!
//! Each record gets a header, a rule, its row, then a `+`-prefixed
//! sub-table of container averages:
//!
//! ```text
//! Version                   | Workload        | Platform        | UUID ...
//! ----------------------------------------------------------------- ...
//! 4.12.3                    | cluster-density | AWS             | abc-123 ...
//! + Container                                     | Metric Value
//! + ----------------------------------------------------------------------
//! + etcd                                          | 0.420000
//! ----------------------------------------------------------------- ...
//! ```

use benchscope_core::{ContainerMetric, CorrelatedRecord};

use crate::Report;

const VERSION_WIDTH: usize = 25;
const WORKLOAD_WIDTH: usize = 15;
const PLATFORM_WIDTH: usize = 15;
const UUID_WIDTH: usize = 40;
const NODES_WIDTH: usize = 15;
const ITERATIONS_WIDTH: usize = 25;
const CHURN_WIDTH: usize = 5;
const CONTAINER_WIDTH: usize = 45;
const VALUE_WIDTH: usize = 25;

/// Width of the rule separating records.
pub const RULE_WIDTH: usize = 195;

/// Render every record; empty when the report has no records.
pub fn render(report: &Report) -> Vec<String> {
    report.records.iter().flat_map(render_record).collect()
}

/// Column header line.
pub fn header() -> String {
    format!(
        "{:<vw$} | {:<ww$} | {:<pw$} | {:<uw$} | {:<nw$} | {:<iw$} | {:<cw$} | {}",
        "Version",
        "Workload",
        "Platform",
        "UUID",
        "Number of Nodes",
        "Workload Iterations",
        "Churn",
        "Date",
        vw = VERSION_WIDTH,
        ww = WORKLOAD_WIDTH,
        pw = PLATFORM_WIDTH,
        uw = UUID_WIDTH,
        nw = NODES_WIDTH,
        iw = ITERATIONS_WIDTH,
        cw = CHURN_WIDTH,
    )
}

/// Lines for one record.
pub fn render_record(record: &CorrelatedRecord) -> Vec<String> {
    let rule = "-".repeat(RULE_WIDTH);
    let run = &record.run;

    let mut lines = vec![
        header(),
        rule.clone(),
        format!(
            "{:<vw$} | {:<ww$} | {:<pw$} | {:<uw$} | {:<nw$} | {:<iw$} | {:<cw$} | {}",
            run.version,
            run.workload,
            run.platform,
            run.uuid,
            run.total_nodes,
            record.job.iterations,
            record.job.churn,
            run.started_at_display(),
            vw = VERSION_WIDTH,
            ww = WORKLOAD_WIDTH,
            pw = PLATFORM_WIDTH,
            uw = UUID_WIDTH,
            nw = NODES_WIDTH,
            iw = ITERATIONS_WIDTH,
            cw = CHURN_WIDTH,
        ),
    ];

    if !record.metrics.is_empty() {
        lines.push(format!(
            "+ {:<cw$} | {:<vw$}",
            "Container",
            "Metric Value",
            cw = CONTAINER_WIDTH,
            vw = VALUE_WIDTH
        ));
        lines.push(format!("+ {}", "-".repeat(CONTAINER_WIDTH + VALUE_WIDTH)));
        for container in record.metrics.iter().flat_map(|m| &m.containers) {
            lines.push(container_line(container));
        }
    }

    lines.push(rule);
    lines
}

fn container_line(metric: &ContainerMetric) -> String {
    format!(
        "+ {:<cw$} | {:<vw$}",
        metric.container,
        format_average(metric.average),
        cw = CONTAINER_WIDTH,
        vw = VALUE_WIDTH
    )
}

/// Six decimals, or `-` when the backend had no value.
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchscope_core::{ContainerMetricSet, JobConfig, MetricTarget, RunRecord};

    fn record(metrics: Vec<ContainerMetricSet>) -> CorrelatedRecord {
        CorrelatedRecord::new(
            RunRecord {
                uuid: "abc-123".into(),
                timestamp: Some(1_700_000_000_000),
                workload: "cluster-density".into(),
                platform: "AWS".into(),
                version: "4.12.3".into(),
                total_nodes: 27,
                result: "Complete".into(),
            },
            JobConfig {
                iterations: 50,
                churn: true,
                ..Default::default()
            },
            metrics,
        )
    }

    fn etcd_set() -> ContainerMetricSet {
        ContainerMetricSet {
            target: MetricTarget::new("openshift-etcd", "containerCPU-Masters"),
            containers: vec![
                ContainerMetric {
                    container: "etcd".into(),
                    average: Some(0.42),
                },
                ContainerMetric {
                    container: "etcd-metrics".into(),
                    average: None,
                },
            ],
        }
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        assert!(render(&Report::assemble(Vec::new())).is_empty());
    }

    #[test]
    fn test_record_layout() {
        let lines = render_record(&record(vec![etcd_set()]));
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("Version                   | Workload        |"));
        assert_eq!(lines[1].len(), RULE_WIDTH);

        let row = &lines[2];
        assert!(row.starts_with("4.12.3                    | cluster-density | AWS             | abc-123"));
        assert!(row.contains("| 27              |"));
        assert!(row.contains("| 50                        |"));
        assert!(row.contains("| true  |"));
        assert!(row.ends_with("| 2023-11-14T22:13:20Z"));

        assert!(lines[3].starts_with("+ Container"));
        assert_eq!(lines[4], format!("+ {}", "-".repeat(70)));
        assert_eq!(lines[5], format!("+ {:<45} | {:<25}", "etcd", "0.420000"));
        assert_eq!(lines[6], format!("+ {:<45} | {:<25}", "etcd-metrics", "-"));
        assert_eq!(lines[7], "-".repeat(RULE_WIDTH));
    }

    #[test]
    fn test_record_without_metrics_has_no_sub_table() {
        let lines = render_record(&record(Vec::new()));
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| !l.starts_with('+')));
    }
}
