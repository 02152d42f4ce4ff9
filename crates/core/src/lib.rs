// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for benchscope.
//!
//! This crate holds the data model shared by every stage of the
//! query-and-correlate pipeline:
//!
//! - [`filter`] - dimension filters and version patterns selected by the user
//! - [`model`] - run records, job configuration and container metric sets
//! - [`outcome`] - per-run correlation outcomes and the batch summary
//! - [`config`] - layered settings (defaults, file, environment)
//!
//! Nothing in here performs I/O against the search backend; see
//! `benchscope-search` for that.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod outcome;

pub use config::Settings;
pub use error::{Error, Result};
pub use filter::{DimensionFilter, VersionPattern};
pub use model::{
    ContainerMetric, ContainerMetricSet, CorrelatedRecord, JobConfig, MetricTarget, RunRecord,
};
pub use outcome::{BatchSummary, RunOutcome, SkipReason, Stage};
