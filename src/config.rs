//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.aiready.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site resource fetching.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Narrative collaborator.
    #[serde(default)]
    pub narrative: NarrativeConfig,

    /// Report output.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Settings for fetching site resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,

    /// User-agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

/// Narrative collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Whether the narrative step runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Chat API endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_narrative_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_narrative_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_api_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_narrative_timeout() -> u64 {
    120
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path for the exported document.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "aiready_report.md".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".aiready.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Narrative settings - always override since they have defaults in CLI
        self.narrative.model = args.model.clone();
        self.narrative.api_url = args.narrative_url.clone();
        self.narrative.temperature = args.temperature;

        // Timeouts - only override if explicitly provided via CLI
        if let Some(timeout) = args.fetch_timeout {
            self.fetch.timeout_seconds = timeout;
        }
        if let Some(timeout) = args.narrative_timeout {
            self.narrative.timeout_seconds = timeout;
        }

        // Flags always override
        if args.no_narrative {
            self.narrative.enabled = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.timeout_seconds, 15);
        assert_eq!(config.narrative.model, "llama3.2:latest");
        assert!(config.narrative.enabled);
        assert_eq!(config.report.output, "aiready_report.md");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[fetch]
timeout_seconds = 5

[narrative]
model = "qwen2.5:14b"
temperature = 0.4
enabled = false

[report]
output = "custom_report.md"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.fetch.user_agent, "Mozilla/5.0");
        assert_eq!(config.narrative.model, "qwen2.5:14b");
        assert_eq!(config.narrative.temperature, 0.4);
        assert!(!config.narrative.enabled);
        assert_eq!(config.report.output, "custom_report.md");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[fetch]"));
        assert!(toml_str.contains("[narrative]"));
        assert!(toml_str.contains("[report]"));
    }
}
