// SPDX-License-Identifier: MIT

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ReviewBackend;
use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaBackend {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            // Remove trailing slashes to avoid //api/generate
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Backend {
                backend: "ollama".into(),
                message: format!("request timed out after {}s", self.timeout_secs),
            }
        } else if e.is_connect() {
            Error::Backend {
                backend: "ollama".into(),
                message: format!("cannot connect to {}: {e}", self.endpoint),
            }
        } else {
            Error::Backend {
                backend: "ollama".into(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ReviewBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: self.model.clone(),
                prompt: prompt.to_string(),
                stream: false,
                options: GenerateOptions {
                    temperature: self.temperature,
                },
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend {
                backend: "ollama".into(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| Error::Backend {
            backend: "ollama".into(),
            message: format!("malformed generate response: {e}"),
        })?;

        Ok(body.response.trim().to_string())
    }

    /// Probes `/api/tags` and checks the configured model is installed, so a
    /// missing server or model degrades with a precise note instead of a
    /// generic generate failure minutes later.
    async fn verify(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Error::Backend {
                backend: "ollama".into(),
                message: format!("HTTP {} from {url}", response.status()),
            });
        }

        let tags: TagsResponse = response.json().await.map_err(|e| Error::Backend {
            backend: "ollama".into(),
            message: format!("malformed tags response: {e}"),
        })?;

        let known = tags.models.iter().any(|m| m.name == self.model);
        if !known {
            let available: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
            return Err(Error::Backend {
                backend: "ollama".into(),
                message: format!(
                    "model '{}' not found (available: {})",
                    self.model,
                    available.join(", ")
                ),
            });
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
