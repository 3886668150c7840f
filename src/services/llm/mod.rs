// SPDX-License-Identifier: MIT

use async_trait::async_trait;

pub mod dryrun;
pub mod ollama;

use crate::config::{Backend, Config};
use crate::error::{Error, Result};

/// One review backend. A single attempt per invocation, bounded by the
/// configured timeout; retries would make CI latency unpredictable.
#[async_trait]
pub trait ReviewBackend: Send + Sync + std::fmt::Debug {
    /// Send the assembled prompt and return the raw generated text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Pre-flight connectivity probe. Default is a no-op.
    async fn verify(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

pub fn create_backend(config: &Config) -> Result<Box<dyn ReviewBackend>> {
    match config.backend {
        Backend::Ollama => Ok(Box::new(ollama::OllamaBackend::new(config))),
        Backend::DryRun => Ok(Box::new(dryrun::DryRunBackend)),
        Backend::Hosted => {
            // The hosted API integration was never finished upstream and its
            // wire shape is unspecified; refuse rather than guess.
            Err(Error::Backend {
                backend: "hosted".into(),
                message: "hosted backend is not implemented".into(),
            })
        }
    }
}
