// SPDX-License-Identifier: MIT

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Rules document not found (tried: {})", candidates.join(", "))]
    #[diagnostic(
        code(reviewgate::docs::missing),
        help("Create ci/ai_checks.md with the review rules and required JSON schema")
    )]
    DocumentMissing { candidates: Vec<String> },

    #[error("Backend '{backend}' error: {message}")]
    #[diagnostic(code(reviewgate::backend::error))]
    Backend { backend: String, message: String },

    #[error("Could not parse model response as JSON: {detail}")]
    #[diagnostic(
        code(reviewgate::response::parse),
        help("The model ignored the raw-JSON output instructions; the raw text is attached to the verdict notes")
    )]
    ResponseParse { detail: String, raw: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(reviewgate::config::error))]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
