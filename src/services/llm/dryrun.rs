// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::ReviewBackend;
use crate::domain::{OverallStatus, ReviewVerdict};
use crate::error::Result;

/// No-op backend for exercising the pipeline without a model server. Always
/// reports a passing verdict whose notes say no review was performed.
#[derive(Debug)]
pub struct DryRunBackend;

#[async_trait]
impl ReviewBackend for DryRunBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        let verdict = ReviewVerdict {
            overall_status: OverallStatus::Pass,
            checks: Vec::new(),
            notes: vec!["Dry-run backend: no model was consulted.".into()],
        };
        // This struct always serializes; see ReviewVerdict::render_block.
        Ok(serde_json::to_string(&verdict).unwrap_or_default())
    }

    fn name(&self) -> &str {
        "dryrun"
    }
}
