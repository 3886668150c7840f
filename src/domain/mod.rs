// SPDX-License-Identifier: MIT

pub mod diff;
pub mod documents;
pub mod verdict;

pub use diff::DiffPayload;
pub use documents::ReviewDocuments;
pub use verdict::{CheckResult, CheckStatus, OverallStatus, ReviewVerdict};
