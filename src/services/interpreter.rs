// SPDX-License-Identifier: MIT

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::ReviewVerdict;
use crate::error::{Error, Result};

/// Opening code fence, optionally with a language tag, e.g. "```json\n"
static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[a-zA-Z0-9_-]*[ \t]*\r?\n?").unwrap());

/// Whether the verdict parsed as-is or required structural cleanup first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitation {
    Clean,
    Salvaged,
}

#[derive(Debug)]
pub struct Interpretation {
    pub verdict: ReviewVerdict,
    pub sanitation: Sanitation,
}

/// Converts raw model text into a structured verdict. Models are instructed
/// to emit raw JSON but are not trusted to comply: well-known wrapping
/// patterns (code fences, leading/trailing prose) are stripped before
/// parsing. Malformed JSON is never repaired, only reported.
pub struct ResponseInterpreter;

impl ResponseInterpreter {
    pub fn interpret(raw: &str) -> Result<Interpretation> {
        let trimmed = raw.trim();
        let mut salvaged = false;

        let unfenced = Self::strip_fence(trimmed);
        if unfenced != trimmed {
            salvaged = true;
        }

        let candidate = Self::extract_object(unfenced);
        if candidate != unfenced {
            salvaged = true;
        }

        match serde_json::from_str::<ReviewVerdict>(candidate) {
            Ok(verdict) => {
                let sanitation = if salvaged {
                    debug!("verdict salvaged after stripping wrapping");
                    Sanitation::Salvaged
                } else {
                    Sanitation::Clean
                };
                Ok(Interpretation {
                    verdict,
                    sanitation,
                })
            }
            Err(e) => Err(Error::ResponseParse {
                detail: e.to_string(),
                raw: raw.to_string(),
            }),
        }
    }

    fn strip_fence(text: &str) -> &str {
        if !text.starts_with("```") {
            return text;
        }
        let inner = match OPENING_FENCE.find(text) {
            Some(m) => &text[m.end()..],
            None => &text[3..],
        };
        inner.trim_end().trim_end_matches("```").trim()
    }

    /// Keep only the first `{` through the last `}`, discarding any prose the
    /// model added around the object despite instructions.
    fn extract_object(text: &str) -> &str {
        match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => &text[start..=end],
            _ => text,
        }
    }
}
