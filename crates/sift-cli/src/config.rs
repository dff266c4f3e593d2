//! CLI configuration file

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sift_client::MockConfig;
use sift_controller::ControllerConfig;

const CONFIG_FILE: &str = "config.toml";

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sift")
        .join(CONFIG_FILE)
}

/// Settings persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format: text or json
    pub format: String,

    pub controller: ControllerConfig,

    /// Simulated backend tuning
    pub backend: MockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            controller: ControllerConfig::default(),
            backend: MockConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.controller.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Keys accepted by `get` and `set`
    pub fn keys() -> &'static [&'static str] {
        &[
            "format",
            "debounce_ms",
            "page_size",
            "total",
            "failure_rate",
            "min_latency_ms",
            "max_latency_ms",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "format" => self.format.clone(),
            "debounce_ms" => self.controller.debounce_ms.to_string(),
            "page_size" => self.backend.page_size.to_string(),
            "total" => self.backend.total.to_string(),
            "failure_rate" => self.backend.failure_rate.to_string(),
            "min_latency_ms" => self.backend.min_latency_ms.to_string(),
            "max_latency_ms" => self.backend.max_latency_ms.to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "format" => match value {
                "text" | "json" => self.format = value.to_string(),
                _ => anyhow::bail!("Invalid format '{}': expected text or json", value),
            },
            "debounce_ms" => {
                let controller = ControllerConfig {
                    debounce_ms: parse(key, value)?,
                };
                controller.validate()?;
                self.controller = controller;
            }
            "page_size" => {
                let page_size: u32 = parse(key, value)?;
                if page_size == 0 {
                    anyhow::bail!("page_size must be at least 1");
                }
                self.backend.page_size = page_size;
            }
            "total" => self.backend.total = parse(key, value)?,
            "failure_rate" => {
                let rate: f64 = parse(key, value)?;
                if !(0.0..=1.0).contains(&rate) {
                    anyhow::bail!("failure_rate must be between 0.0 and 1.0");
                }
                self.backend.failure_rate = rate;
            }
            "min_latency_ms" => self.backend.min_latency_ms = parse(key, value)?,
            "max_latency_ms" => self.backend.max_latency_ms = parse(key, value)?,
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> anyhow::Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {}: {}", key, value))
}
