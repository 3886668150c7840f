// SPDX-License-Identifier: MIT

use console::style;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    documents::DocumentStore,
    git::DiffProvider,
    interpreter::{ResponseInterpreter, Sanitation},
    llm,
    policy::{self, Decision, ReviewOutcome},
    prompt::PromptBuilder,
};

pub struct App {
    cli: Cli,
    config: Config,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load()?;
        debug!(
            backend = %config.backend,
            model = %config.model,
            endpoint = %config.endpoint,
            strict = config.strict,
            "config loaded"
        );
        Ok(Self { cli, config })
    }

    /// Runs the pipeline and returns the process exit code. Every path
    /// through here emits a verdict between the JSON markers; recoverable
    /// failures become degraded verdicts at the stage boundary where they
    /// occur, and only a missing rules document short-circuits the pipeline.
    pub async fn run(&self) -> u8 {
        self.print_status("AI review gate");
        self.print_info(&format!(
            "backend: {} | model: {} | endpoint: {}",
            self.config.backend, self.config.model, self.config.endpoint
        ));

        let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());

        let docs = match DocumentStore::new(&cwd).load() {
            Ok(docs) => docs,
            Err(e) => {
                warn!(error = %e, "rules document missing, review cannot proceed");
                return self.conclude(ReviewOutcome::MissingRules {
                    detail: e.to_string(),
                });
            }
        };

        let diff = DiffProvider::new(&cwd).collect();
        if diff.degraded {
            self.print_info("diff retrieved via fallback path");
        }

        if diff.is_no_changes() {
            self.print_info("no changes found to review");
            return self.conclude(ReviewOutcome::NoChanges);
        }

        debug!(
            chars = diff.text.chars().count(),
            cap = self.config.max_diff_chars,
            "building prompt"
        );
        let prompt = PromptBuilder::build(&docs, &diff, self.config.max_diff_chars);

        if self.cli.show_prompt {
            eprintln!("{}", style("--- PROMPT ---").dim());
            eprintln!("{prompt}");
            eprintln!("{}", style("--- END PROMPT ---").dim());
        }

        let outcome = self.consult_model(&prompt).await;
        self.conclude(outcome)
    }

    /// Single attempt: create the backend, verify it, generate, and parse.
    /// Any failure along the way becomes a StageFailure carrying the
    /// technical detail for the verdict notes.
    async fn consult_model(&self, prompt: &str) -> ReviewOutcome {
        let backend = match llm::create_backend(&self.config) {
            Ok(backend) => backend,
            Err(e) => {
                warn!(error = %e, "backend unavailable");
                return ReviewOutcome::StageFailure {
                    detail: e.to_string(),
                };
            }
        };

        if let Err(e) = backend.verify().await {
            warn!(backend = backend.name(), error = %e, "backend verification failed");
            return ReviewOutcome::StageFailure {
                detail: e.to_string(),
            };
        }

        self.print_status(&format!(
            "Contacting {} ({})...",
            backend.name(),
            self.config.model
        ));

        let raw = match backend.generate(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "model invocation failed");
                return ReviewOutcome::StageFailure {
                    detail: e.to_string(),
                };
            }
        };

        debug!(raw_len = raw.len(), "interpreting model response");
        match ResponseInterpreter::interpret(&raw) {
            Ok(interpretation) => {
                if interpretation.sanitation == Sanitation::Salvaged {
                    debug!("response needed structural cleanup before parsing");
                }
                ReviewOutcome::Parsed(interpretation.verdict)
            }
            Err(e) => {
                warn!(error = %e, "model response did not parse");
                let detail = match &e {
                    Error::ResponseParse { detail, raw } => {
                        format!("{detail}; raw response: {raw}")
                    }
                    other => other.to_string(),
                };
                ReviewOutcome::StageFailure { detail }
            }
        }
    }

    fn conclude(&self, outcome: ReviewOutcome) -> u8 {
        let Decision { verdict, exit_code } = policy::decide(outcome, self.config.strict);

        match exit_code {
            policy::EXIT_OK => self.print_status("review accepted (exit 0)"),
            _ => self.print_status("review failed (exit 1)"),
        }

        println!("{}", verdict.render_block());
        exit_code
    }

    fn print_status(&self, msg: &str) {
        println!("{} {}", style("→").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        println!("{} {}", style("info:").cyan(), msg);
    }
}
