// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::domain::DiffPayload;

/// Produces the best available text describing the pending change by walking
/// an ordered fallback chain over git state. Never fails: when every git
/// source is unusable it returns diagnostic text so the failure ends up in
/// the prompt and in the model's notes instead of crashing the pipeline.
pub struct DiffProvider {
    work_dir: PathBuf,
}

struct CmdOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

impl DiffProvider {
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    /// Fallback order:
    /// 1. diff of the last commit (`HEAD~1..HEAD`), when a prior commit exists
    /// 2. diff of uncommitted working-tree changes, prefixed with a note
    /// 3. diagnostic text: last git error plus a short status summary
    ///
    /// Empty output from successful diff commands is the distinguished
    /// no-changes case (empty text, not degraded).
    pub fn collect(&self) -> DiffPayload {
        let mut last_error = String::new();

        let head_diff = if self.git(&["rev-parse", "HEAD~1"]).success {
            let out = self.git(&["diff", "--unified=0", "HEAD~1"]);
            if out.success && !out.stdout.trim().is_empty() {
                debug!(chars = out.stdout.len(), "diff from HEAD~1");
                return DiffPayload::clean(out.stdout);
            }
            if !out.success {
                last_error = out.stderr;
            }
            out.success
        } else {
            debug!("no HEAD~1 reference, falling back to working tree");
            false
        };

        let worktree = self.git(&["diff", "--unified=0"]);
        if worktree.success && !worktree.stdout.trim().is_empty() {
            debug!(chars = worktree.stdout.len(), "diff from working tree");
            let text = format!(
                "# Fallback diff (HEAD~1 comparison unavailable)\n{}",
                worktree.stdout
            );
            return DiffPayload::fallback(text);
        }

        if worktree.success && (head_diff || last_error.is_empty()) {
            // Every diff command that ran succeeded and produced nothing.
            debug!("no changes detected");
            return DiffPayload::clean(String::new());
        }

        if !worktree.success {
            last_error = worktree.stderr;
        }

        let status = self.git(&["status", "--short", "--branch"]);
        let status_summary = if status.success {
            status.stdout
        } else {
            status.stderr
        };

        let text = format!(
            "Could not obtain a usable diff to review.\n\n\
             Last git error:\n{}\n\n\
             Output of 'git status --short --branch':\n{}",
            last_error.trim(),
            status_summary.trim()
        );
        debug!("diff retrieval failed, embedding diagnostic text");
        DiffPayload::fallback(text)
    }

    fn git(&self, args: &[&str]) -> CmdOutput {
        match Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
        {
            Ok(output) => CmdOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => CmdOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("failed to run git {}: {e}", args.join(" ")),
            },
        }
    }
}
