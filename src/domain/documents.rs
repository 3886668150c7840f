// SPDX-License-Identifier: MIT

/// The documents a review run is bound to. Loaded once, read-only thereafter.
#[derive(Debug, Clone)]
pub struct ReviewDocuments {
    /// Review rules plus the JSON schema the model must emit. Required and
    /// guaranteed non-empty by the document store.
    pub rules: String,
    /// Project context for the reviewer. Optional; empty when no spec file
    /// exists.
    pub project_spec: String,
}
