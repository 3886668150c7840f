// SPDX-License-Identifier: MIT

use crate::domain::{OverallStatus, ReviewVerdict};

/// Exit code for an accepted verdict or a tolerated degraded run.
pub const EXIT_OK: u8 = 0;
/// Exit code for an explicit fail verdict or a strict-mode degraded run.
pub const EXIT_FAIL: u8 = 1;

/// Every way a run can conclude. The policy is total over this type: each
/// variant maps to both a verdict and an exit code, so no code path can
/// terminate without producing the JSON contract.
#[derive(Debug)]
pub enum ReviewOutcome {
    /// The rules document was missing at every candidate path.
    MissingRules { detail: String },
    /// The diff was genuinely empty; the model was never invoked.
    NoChanges,
    /// The backend call or response parsing failed.
    StageFailure { detail: String },
    /// The model produced a well-formed verdict.
    Parsed(ReviewVerdict),
}

#[derive(Debug)]
pub struct Decision {
    pub verdict: ReviewVerdict,
    pub exit_code: u8,
}

/// Folds an outcome and the strict-mode flag into the final verdict and
/// process exit code.
pub fn decide(outcome: ReviewOutcome, strict: bool) -> Decision {
    let degraded_exit = if strict { EXIT_FAIL } else { EXIT_OK };

    match outcome {
        ReviewOutcome::MissingRules { detail } => Decision {
            verdict: ReviewVerdict::degraded(detail),
            exit_code: degraded_exit,
        },
        ReviewOutcome::NoChanges => Decision {
            verdict: ReviewVerdict::no_changes(),
            exit_code: EXIT_OK,
        },
        ReviewOutcome::StageFailure { detail } => Decision {
            verdict: ReviewVerdict::degraded(detail),
            exit_code: degraded_exit,
        },
        ReviewOutcome::Parsed(mut verdict) => {
            // Fail closed: a status the schema does not recognize (or a
            // missing one) is a fail, never a silent accept.
            if verdict.overall_status == OverallStatus::Unrecognized {
                verdict.overall_status = OverallStatus::Fail;
                verdict
                    .notes
                    .push("overall_status was missing or unrecognized; treated as fail.".into());
            }

            let exit_code = if verdict.overall_status.is_fail_closed() {
                EXIT_FAIL
            } else {
                EXIT_OK
            };
            Decision { verdict, exit_code }
        }
    }
}
