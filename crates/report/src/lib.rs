// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Report assembly and rendering for benchscope.
//!
//! This crate turns the ordered outcomes of a batch into a [`Report`] and
//! renders it.
//!
//! # Quick Start
//!
//! ```
//! use benchscope_report::{table, Report};
//!
//! let report = Report::assemble(Vec::new());
//! assert!(table::render(&report).is_empty());
//! ```
//!
//! # Modules
//!
//! - [`assembler`] - The [`Report`] struct and outcome aggregation
//! - [`table`] - Fixed-column console table
//! - [`markdown`] - Markdown report generation
//! - [`io`] - Writing reports to an output directory

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod io;
pub mod markdown;
pub mod table;

pub use assembler::Report;
pub use io::{OutputFormat, ReportError};
