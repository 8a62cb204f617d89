use serde::{Deserialize, Serialize};

use crate::error::{JobscopeError, Result};

/// Job service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Root of the job service, e.g. `http://localhost:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// REST API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Root of the versioned REST API, without a trailing slash.
    pub fn api_root(&self) -> String {
        format!(
            "{}/rest_api/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(JobscopeError::Config(format!(
                "upstream.base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.api_version.is_empty() || self.api_version.contains('/') {
            return Err(JobscopeError::Config(format!(
                "upstream.api_version is not a path segment: {:?}",
                self.api_version
            )));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_api_version() -> String {
    "v4".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_strips_trailing_slash() {
        let config = UpstreamConfig {
            base_url: "http://odin.example.org/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_root(), "http://odin.example.org/rest_api/v4");
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let config = UpstreamConfig {
            base_url: "ftp://odin.example.org".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
