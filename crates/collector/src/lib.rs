// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run correlator for benchscope.
//!
//! Given the runs returned by the primary query, the correlator joins each
//! one with its job summary and its per-container metric aggregations:
//!
//! ```text
//! primary query ──► RunRecord* ──► correlate (bounded pool, input order kept)
//!                                     ├─ validate status / uuid
//!                                     ├─ jobSummary lookup (first hit wins)
//!                                     └─ one aggregation per metric target
//!                                 ──► RunOutcome* + BatchSummary
//! ```
//!
//! Only a failure of the primary query is fatal. A failed sub-query fails
//! that run alone, unless strict mode is enabled.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod correlator;
pub mod error;
pub mod pipeline;

#[cfg(test)]
mod fake;

pub use correlator::{Correlator, CorrelatorConfig};
pub use error::{CollectorError, Result};
pub use pipeline::{Batch, Pipeline};
