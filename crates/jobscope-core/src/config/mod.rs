mod observability;
mod upstream;

pub use observability::ObservabilityConfig;
pub use upstream::UpstreamConfig;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{JobscopeError, Result};
use crate::models::check_segment;

/// Root configuration for jobscope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobscopeConfig {
    /// Job service the dashboard reads from.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Dashboard presentation settings.
    #[serde(default)]
    pub dashboard: DashboardSettings,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl JobscopeConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| JobscopeError::Config(format!("Failed to read config file: {}", e)))?;

        tracing::debug!(path = %path.as_ref().display(), "Parsing configuration");
        Self::parse_toml(&content)
    }

    /// Load configuration from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                path = %path.as_ref().display(),
                "No configuration file, using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);

        let config: Self = toml::from_str(&content)
            .map_err(|e| JobscopeError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.upstream.validate()?;
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(JobscopeError::Config(
                "dashboard.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        check_segment(&self.dashboard.default_project).map_err(|_| {
            JobscopeError::Config(format!(
                "dashboard.default_project is not a valid project name: {:?}",
                self.dashboard.default_project
            ))
        })?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port.
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8080
}

/// Dashboard presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Title shown in the page header.
    #[serde(default = "default_title")]
    pub title: String,

    /// Project shown when none is named.
    #[serde(default = "default_project")]
    pub default_project: String,

    /// How often the browser re-polls the API.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            default_project: default_project(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_title() -> String {
    "Processing status".to_string()
}

fn default_project() -> String {
    "QSMRVDS".to_string()
}

fn default_refresh_interval() -> u64 {
    60
}

static ENV_VAR: Lazy<regex_lite::Regex> =
    Lazy::new(|| regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid regex"));

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    for cap in ENV_VAR.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
