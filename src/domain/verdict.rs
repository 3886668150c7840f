// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Marker lines surrounding the final JSON block on stdout. Downstream CI
/// tooling extracts the verdict by searching for these exact strings.
pub const JSON_START_MARKER: &str = "=== AI REVIEW JSON START ===";
pub const JSON_END_MARKER: &str = "=== AI REVIEW JSON END ===";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Pass,
    Fail,
    /// Reserved for locally synthesized degraded verdicts; a compliant model
    /// never emits it.
    Unknown,
    /// Anything else the model put in the field. Normalized to `fail` by the
    /// verdict policy before the result is emitted, so it never serializes.
    #[serde(other)]
    Unrecognized,
}

impl OverallStatus {
    pub fn is_fail_closed(self) -> bool {
        matches!(self, Self::Fail | Self::Unrecognized)
    }
}

// A missing overall_status field is treated the same as an unrecognized one.
fn default_status() -> OverallStatus {
    OverallStatus::Unrecognized
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

/// A single rule evaluation from the model, reproduced verbatim in the
/// emitted JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: String,
}

/// The structured result consumed by the CI pipeline's pass/fail decision.
/// Every code path produces one of these; no run exits without emitting a
/// well-formed verdict between the JSON markers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewVerdict {
    #[serde(default = "default_status")]
    pub overall_status: OverallStatus,
    #[serde(default)]
    pub checks: Vec<CheckResult>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ReviewVerdict {
    /// Degraded verdict synthesized when a pipeline stage could not complete.
    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            overall_status: OverallStatus::Unknown,
            checks: Vec::new(),
            notes: vec![
                "AI reviewer could not complete normally.".into(),
                format!("Technical detail: {}", detail.into()),
            ],
        }
    }

    /// Immediate pass emitted when the diff is genuinely empty.
    pub fn no_changes() -> Self {
        Self {
            overall_status: OverallStatus::Pass,
            checks: Vec::new(),
            notes: vec!["No changes found to review.".into()],
        }
    }

    /// Indented JSON between the literal marker lines.
    pub fn render_block(&self) -> String {
        // Serialization of this struct cannot fail: no maps, no non-string keys.
        let json = serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| r#"{"overall_status":"unknown","checks":[],"notes":[]}"#.into());
        format!("{JSON_START_MARKER}\n{json}\n{JSON_END_MARKER}")
    }
}
