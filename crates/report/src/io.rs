// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for reports.
//!
//! Writes a report to an output directory as JSON and/or markdown, and reads
//! a JSON report back.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::markdown;
use crate::Report;

/// JSON report file name.
pub const JSON_FILE: &str = "report.json";

/// Markdown summary file name.
pub const SUMMARY_FILE: &str = "summary.md";

/// Errors that can occur while writing or reading reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem error
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown output format
    #[error("Unknown output format: {0} (expected json, markdown or both)")]
    UnknownFormat(String),
}

/// Result type for report I/O.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Which files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `report.json` only.
    Json,
    /// `summary.md` only.
    Markdown,
    /// Both files.
    #[default]
    Both,
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "both" => Ok(OutputFormat::Both),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the report as pretty JSON to `path`.
pub fn write_report_json(report: &Report, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).map_err(io_err(path))
}

/// Write the markdown summary to `path`.
pub fn write_summary(report: &Report, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, markdown::generate_summary(report)).map_err(io_err(path))
}

/// Write the selected outputs into `dir`, creating it if needed.
///
/// Returns the paths written.
pub fn write_all_outputs(
    report: &Report,
    dir: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let mut written = Vec::new();
    if matches!(format, OutputFormat::Json | OutputFormat::Both) {
        let path = dir.join(JSON_FILE);
        write_report_json(report, &path)?;
        written.push(path);
    }
    if matches!(format, OutputFormat::Markdown | OutputFormat::Both) {
        let path = dir.join(SUMMARY_FILE);
        write_summary(report, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Read a report from a JSON file.
pub fn read_report_json(path: impl AsRef<Path>) -> Result<Report> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(io_err(path))?;
    Ok(serde_json::from_str(&content)?)
}
