// SPDX-License-Identifier: MIT

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Ollama,
    Hosted,
    DryRun,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Hosted => write!(f, "hosted"),
            Self::DryRun => write!(f, "dryrun"),
        }
    }
}

/// Process-wide configuration, built once at startup and threaded through
/// every pipeline stage. Never read from the environment after `load`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation backend
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Diff length cap in characters; longer diffs are truncated with a notice
    #[serde(default = "default_max_diff_chars")]
    pub max_diff_chars: usize,

    /// Request timeout in seconds (default 300)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Strict mode: a degraded result fails the pipeline instead of warning
    #[serde(default, deserialize_with = "lenient_bool")]
    pub strict: bool,

    /// Sampling temperature (0.0-2.0, default 0.1)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_model() -> String {
    "llama3:8b".into()
}
fn default_endpoint() -> String {
    "http://localhost:11434".into()
}
fn default_max_diff_chars() -> usize {
    2_000
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_temperature() -> f32 {
    0.1
}

/// Accept `true`/`false`, `1`/`0`, and their string forms. CI configs
/// traditionally set `AI_REVIEW_STRICT=1`.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct FlagVisitor;

    impl serde::de::Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a boolean, 0/1, or a true/false string")
        }

        fn visit_bool<E>(self, v: bool) -> std::result::Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                other => Err(E::custom(format!("not a boolean flag: '{other}'"))),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: default_model(),
            endpoint: default_endpoint(),
            max_diff_chars: default_max_diff_chars(),
            timeout_secs: default_timeout_secs(),
            strict: false,
            temperature: default_temperature(),
        }
    }
}

impl Config {
    /// Load with priority: AI_REVIEW_* env > legacy aliases (OLLAMA_MODEL,
    /// OLLAMA_URL, AI_REVIEW_TIMEOUT_SECONDS) > project config
    /// (.reviewgate.toml) > defaults
    pub fn load() -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.reviewgate.toml in the working directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".reviewgate.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        // Legacy environment names from the pre-gate reviewer setup
        figment = figment.merge(
            Env::prefixed("OLLAMA_")
                .only(&["model", "url"])
                .map(|key| {
                    if key.as_str().eq_ignore_ascii_case("url") {
                        "endpoint".into()
                    } else {
                        key.as_str().to_owned().into()
                    }
                }),
        );

        // Older deployments spell the timeout AI_REVIEW_TIMEOUT_SECONDS;
        // accept it below the canonical name.
        figment = figment.merge(
            Env::prefixed("AI_REVIEW_")
                .only(&["timeout_seconds"])
                .map(|_| "timeout_secs".into()),
        );

        // Environment variables (AI_REVIEW_MODEL, AI_REVIEW_STRICT, etc.)
        figment = figment.merge(Env::prefixed("AI_REVIEW_"));

        let config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::Config("model cannot be empty".into()));
        }

        let url = Url::parse(&self.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint '{}': {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "endpoint must be http:// or https://, got '{}'",
                self.endpoint
            )));
        }

        if !(100..=1_000_000).contains(&self.max_diff_chars) {
            return Err(Error::Config(format!(
                "max_diff_chars must be 100–1000000, got {}",
                self.max_diff_chars
            )));
        }

        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        Ok(())
    }
}
