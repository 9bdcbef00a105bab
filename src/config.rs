//! Configuration for the registry client and report generation

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Main configuration for an analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Registry configuration
    pub registry: RegistryConfig,
    /// Dependencies to leave out of the report
    pub ignored_dependencies: HashSet<String>,
}

/// Registry access and throttling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL; packages are fetched from `<base_url>/<name>/latest`
    pub base_url: String,
    /// Request timeout in seconds (none by default)
    pub timeout_secs: Option<u64>,
    /// Pause after every request (milliseconds)
    pub request_delay_ms: u64,
    /// Pause for `batch_pause_secs` after every this many requests (0 disables)
    pub batch_size: u64,
    /// Length of the batch pause in seconds
    pub batch_pause_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_secs: None,
            request_delay_ms: 100,
            batch_size: 50,
            batch_pause_secs: 60,
        }
    }
}

impl RegistryConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Get request delay as Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Get batch pause as Duration
    pub fn batch_pause(&self) -> Duration {
        Duration::from_secs(self.batch_pause_secs)
    }

    /// Check that the base URL is usable
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ReportError::config("Registry base URL must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ReportError::config(format!(
                "Registry base URL must be http(s), got {}",
                url
            )));
        }
        Ok(())
    }
}

impl AnalyzerConfig {
    /// Create a new builder for AnalyzerConfig
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.registry.validate()?;
        Ok(config)
    }
}

/// Builder for AnalyzerConfig
#[derive(Default)]
pub struct AnalyzerConfigBuilder {
    registry: Option<RegistryConfig>,
    ignored_dependencies: HashSet<String>,
}

impl AnalyzerConfigBuilder {
    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn ignore_dependency(mut self, name: impl Into<String>) -> Self {
        self.ignored_dependencies.insert(name.into());
        self
    }

    pub fn build(self) -> AnalyzerConfig {
        AnalyzerConfig {
            registry: self.registry.unwrap_or_default(),
            ignored_dependencies: self.ignored_dependencies,
        }
    }
}
