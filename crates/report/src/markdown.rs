// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown output generation for benchmark reports.

use benchscope_core::CorrelatedRecord;
use std::fmt::{self, Write};

use crate::table::format_average;
use crate::Report;

/// Generate a markdown summary: one table row per record, then a container
/// table per record that has metrics.
pub fn generate_summary(report: &Report) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut output, report);
    output
}

fn write_summary(out: &mut String, report: &Report) -> fmt::Result {
    writeln!(out, "# Benchmark Report")?;
    writeln!(out)?;
    writeln!(out, "Generated: {}", report.generated_at.to_rfc3339())?;
    writeln!(out)?;

    if report.is_empty() {
        writeln!(out, "No matching runs.")?;
    } else {
        writeln!(out, "## Runs")?;
        writeln!(out)?;
        writeln!(
            out,
            "| Version | Workload | Platform | UUID | Nodes | Iterations | Churn | Churn % | Date |"
        )?;
        writeln!(
            out,
            "|---------|----------|----------|------|-------|------------|-------|---------|------|"
        )?;
        for record in &report.records {
            write_run_row(out, record)?;
        }

        for record in report.records.iter().filter(|r| !r.metrics.is_empty()) {
            writeln!(out)?;
            write_metrics(out, record)?;
        }
    }

    if let Some(summary) = &report.summary {
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(
            out,
            "Runs fetched: {} | accepted: {} | skipped: {} | failed: {}",
            summary.fetched,
            summary.accepted,
            summary.total_skipped(),
            summary.failed
        )?;
        for (reason, count) in &summary.skipped {
            writeln!(out, "- skipped ({}): {}", reason, count)?;
        }
    }

    Ok(())
}

fn write_run_row(out: &mut String, record: &CorrelatedRecord) -> fmt::Result {
    let run = &record.run;
    writeln!(
        out,
        "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
        run.version,
        run.workload,
        run.platform,
        run.uuid,
        run.total_nodes,
        record.job.iterations,
        record.job.churn,
        record.job.churn_percent,
        run.started_at_display()
    )
}

fn write_metrics(out: &mut String, record: &CorrelatedRecord) -> fmt::Result {
    writeln!(out, "### {}", record.uuid())?;
    for set in &record.metrics {
        writeln!(out)?;
        writeln!(out, "**{}**", set.target)?;
        writeln!(out)?;
        writeln!(out, "| Container | Metric Value |")?;
        writeln!(out, "|-----------|--------------|")?;
        for metric in &set.containers {
            writeln!(
                out,
                "| {} | {} |",
                metric.container,
                format_average(metric.average)
            )?;
        }
    }
    Ok(())
}
