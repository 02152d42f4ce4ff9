// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dimension filters selected on the command line.
//!
//! A [`DimensionFilter`] names one keyword field and the values accepted for
//! it. Values within a dimension are OR-ed; dimensions are AND-ed by the query
//! builder in `benchscope-search`. Both types validate on construction so that
//! query building itself can never fail.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Keyword field holding the platform name.
pub const PLATFORM_FIELD: &str = "platform.keyword";

/// Keyword field holding the workload (benchmark) name.
pub const WORKLOAD_FIELD: &str = "benchmark.keyword";

/// Document field compared against a [`VersionPattern`].
pub const VERSION_FIELD: &str = "ocp_version";

/// A keyword field and its accepted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionFilter {
    field: String,
    values: Vec<String>,
}

impl DimensionFilter {
    /// Create a filter over `field`.
    ///
    /// Blank values are dropped; if nothing remains the filter is rejected.
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        let values: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            return Err(Error::invalid_input(format!(
                "at least one value is required for {}",
                field
            )));
        }

        Ok(Self { field, values })
    }

    /// Split a comma-separated flag value, e.g. `AWS,ROSA`.
    pub fn from_csv(field: impl Into<String>, csv: &str) -> Result<Self> {
        Self::new(field, csv.split(','))
    }

    /// Platform filter from a comma-separated list.
    pub fn platforms(csv: &str) -> Result<Self> {
        Self::from_csv(PLATFORM_FIELD, csv)
    }

    /// Workload filter from a comma-separated list.
    pub fn workloads(csv: &str) -> Result<Self> {
        Self::from_csv(WORKLOAD_FIELD, csv)
    }

    /// The keyword field this filter applies to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Accepted values, in the order given.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Version expression, optionally ending in a `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPattern(String);

impl VersionPattern {
    /// Create a pattern. Empty input is rejected.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into().trim().to_string();
        if pattern.is_empty() {
            return Err(Error::invalid_input("version pattern cannot be empty"));
        }
        Ok(Self(pattern))
    }

    /// Get the pattern as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the pattern ends with a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.0.ends_with('*')
    }

    /// `query_string` expression comparing the version field to this pattern.
    pub fn to_query_string(&self) -> String {
        format!("{} == {}", VERSION_FIELD, self.0)
    }
}

impl std::fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
