// SPDX-License-Identifier: MIT

use clap::Parser;

/// Review behavior is entirely configuration-driven (AI_REVIEW_* environment
/// variables and .reviewgate.toml); the CLI only carries diagnostic switches.
#[derive(Parser, Debug, Default)]
#[command(name = "reviewgate")]
#[command(version)]
#[command(about = "AI code-review gate for CI pipelines", long_about = None)]
pub struct Cli {
    /// Show the prompt sent to the model
    #[arg(long)]
    pub show_prompt: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
