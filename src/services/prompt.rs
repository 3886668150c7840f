// SPDX-License-Identifier: MIT

use crate::domain::{DiffPayload, ReviewDocuments};

/// Assembles the single instruction payload sent to the model. Pure and
/// deterministic: same documents and diff in, same prompt out.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(docs: &ReviewDocuments, diff: &DiffPayload, max_diff_chars: usize) -> String {
        let bounded_diff = Self::bound_diff(&diff.text, max_diff_chars);

        format!(
            "You are an automated code reviewer integrated into a CI pipeline.\n\
             \n\
             You MUST strictly follow the instructions and JSON output format defined\n\
             in the rules document below.\n\
             \n\
             --- PROJECT SPECIFICATION (CONTEXT) ---\n\
             {project_spec}\n\
             --- END PROJECT SPECIFICATION ---\n\
             \n\
             --- RULES DOCUMENT (REVIEW RULES + REQUIRED JSON SCHEMA) ---\n\
             {rules}\n\
             --- END RULES DOCUMENT ---\n\
             \n\
             --- DIFF TO REVIEW ---\n\
             {bounded_diff}\n\
             --- END DIFF ---\n\
             \n\
             VERY IMPORTANT INSTRUCTIONS:\n\
             \n\
             - Your output MUST be a single VALID RAW JSON object, with NO markdown formatting.\n\
             - DO NOT wrap your response in triple backticks (```json or ```).\n\
             - DO NOT add explanations before or after the JSON.\n\
             - DO NOT include comments in the JSON.\n\
             - The JSON MUST follow the exact schema described in the rules document\n\
               (including overall_status, checks, notes).\n\
             - Base your evaluation ONLY on the diff, the rules document, and the\n\
               project specification.",
            project_spec = docs.project_spec,
            rules = docs.rules,
        )
    }

    /// Caps the diff at `max_chars` characters (Unicode scalar values, never
    /// byte slicing) and appends a notice so the model knows content was cut
    /// and does not infer that later files were unchanged.
    fn bound_diff(diff: &str, max_chars: usize) -> String {
        if diff.chars().count() <= max_chars {
            return diff.to_string();
        }

        let truncated: String = diff.chars().take(max_chars).collect();
        format!(
            "{truncated}\n\n[Diff truncated to {max_chars} characters to fit the model context.]"
        )
    }
}
