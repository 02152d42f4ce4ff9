// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Search gateway for benchscope.
//!
//! This crate is the only I/O boundary of the pipeline. It provides:
//!
//! - **Query bodies** ([`query`]): the run filter, the job summary lookup and
//!   the per-container metric aggregation, in the backend's query DSL
//! - **Envelopes** ([`envelope`]): typed views of `hits.hits[]._source` and
//!   `aggregations.<name>.buckets[]`
//! - **Backend** ([`backend`]): the [`SearchBackend`] trait and its
//!   OpenSearch/Elasticsearch HTTP implementation ([`client`])
//! - **Gateway** ([`gateway`]): retries transient failures and decodes
//!   responses into core types
//!
//! # Example
//!
//! ```ignore
//! use benchscope_search::prelude::*;
//!
//! let client = OpenSearchClient::new("https://search:9200", ClientOptions::default())?;
//! let gateway = SearchGateway::new(Arc::new(client), "ripsaw-kube-burner*");
//! let runs = gateway.runs(&run_query, 10_000).await?;
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod backend;
pub mod client;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod query;

pub use backend::SearchBackend;
pub use client::{ClientOptions, OpenSearchClient};
pub use error::{Result, SearchError};
pub use gateway::{RetryPolicy, SearchGateway};
pub use query::RunQuery;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::backend::SearchBackend;
    pub use super::client::{ClientOptions, OpenSearchClient};
    pub use super::error::{Result, SearchError};
    pub use super::gateway::{RetryPolicy, SearchGateway};
    pub use super::query::RunQuery;
}
