// SPDX-License-Identifier: MIT

/// The text to review, as produced by the diff fallback chain.
///
/// `degraded` records that the text came from a fallback path (working-tree
/// diff or diagnostic output). It is used for logging only and never feeds
/// into the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPayload {
    pub text: String,
    pub degraded: bool,
}

impl DiffPayload {
    pub fn clean(text: String) -> Self {
        Self {
            text,
            degraded: false,
        }
    }

    pub fn fallback(text: String) -> Self {
        Self {
            text,
            degraded: true,
        }
    }

    /// Empty text from a non-degraded path means the repository genuinely has
    /// no changes; the pipeline short-circuits to a pass without calling the
    /// model. Diagnostic text from a failed retrieval is never empty, so the
    /// two cases stay distinguishable.
    pub fn is_no_changes(&self) -> bool {
        !self.degraded && self.text.trim().is_empty()
    }
}
