//! Scan settings merged from CLI flags and `[tool.depscan]`
//!
//! Precedence: CLI flag, then the pyproject.toml section, then built-in default.

use crate::error::ConfigError;
use crate::manifest::ToolConfig;
use crate::registry::{DEFAULT_TIMEOUT, PYPI_URL};
use std::time::Duration;

/// Effective settings for one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Package index base URL, without trailing slash
    pub index_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            index_url: PYPI_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ScanSettings {
    /// Merge CLI values over the tool section and validate the result
    pub fn merge(
        tool: &ToolConfig,
        cli_index_url: Option<&str>,
        cli_timeout: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let index_url = cli_index_url
            .or(tool.index_url.as_deref())
            .unwrap_or(PYPI_URL)
            .trim();
        if !(index_url.starts_with("http://") || index_url.starts_with("https://")) {
            return Err(ConfigError::InvalidIndexUrl {
                value: index_url.to_string(),
            });
        }

        let timeout = match cli_timeout.or(tool.timeout) {
            Some(0) => return Err(ConfigError::InvalidTimeout { value: 0 }),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            index_url: index_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}
