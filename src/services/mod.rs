// SPDX-License-Identifier: MIT

pub mod documents;
pub mod git;
pub mod interpreter;
pub mod llm;
pub mod policy;
pub mod prompt;
