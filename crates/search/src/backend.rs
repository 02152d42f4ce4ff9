// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! The search backend seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// A document store that executes query DSL bodies against an index pattern.
///
/// Implementations must be safe to share between concurrent workers; the
/// gateway holds one behind an `Arc` for the whole batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute `body` against `index` and return the raw response body.
    ///
    /// Non-success responses are errors.
    async fn search(&self, index: &str, body: &Value) -> Result<Value>;
}
