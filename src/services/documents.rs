// SPDX-License-Identifier: MIT

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::ReviewDocuments;
use crate::error::{Error, Result};

/// Candidate locations for the rules/schema document, relative to the
/// repository root. First existing non-empty file wins.
const RULES_CANDIDATES: &[&str] = &["ci/ai_checks.md", ".github/ai-checks.md"];

/// Candidate locations for the optional project-context document.
const SPEC_CANDIDATES: &[&str] = &["product_spec.md", "docs/product_spec.md"];

pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Loads both documents. A missing rules document is the single fatal
    /// condition in the whole pipeline: without it there is no contract to
    /// review against. A missing project spec only costs the model context.
    pub fn load(&self) -> Result<ReviewDocuments> {
        let rules = self.load_rules()?;
        let project_spec = self.load_project_spec();
        Ok(ReviewDocuments {
            rules,
            project_spec,
        })
    }

    fn load_rules(&self) -> Result<String> {
        for candidate in RULES_CANDIDATES {
            let path = self.root.join(candidate);
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            // A blank rules file defines no contract; keep scanning.
            if content.trim().is_empty() {
                debug!(path = %path.display(), "rules candidate is empty, skipping");
                continue;
            }
            debug!(path = %path.display(), "rules document loaded");
            return Ok(content);
        }

        Err(Error::DocumentMissing {
            candidates: RULES_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn load_project_spec(&self) -> String {
        for candidate in SPEC_CANDIDATES {
            let path = self.root.join(candidate);
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    debug!(path = %path.display(), "project spec loaded");
                    return content;
                }
            }
        }
        debug!("no project spec found, continuing without extra context");
        String::new()
    }
}
