//! Client configuration.
//!
//! Every setting can be given as a command line flag or an environment
//! variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIFT_BACKEND_URL` | http://127.0.0.1:3100 | Backend base URL |
//! | `SIFT_SEARCH_PATH` | fhir | Search endpoint path under the backend URL |
//! | `SIFT_INSPECT_PATH` | inspect | Inspection endpoint path under the backend URL |
//! | `SIFT_FIELD_CONFIG_URL` | http://127.0.0.1:3000/fhir-config | Root URL of the field configuration documents |
//! | `SIFT_FIELD_CONFIG_DIR` | (unset) | Local directory of field configuration documents; overrides the URL |
//! | `SIFT_SEARCH_MODE` | accelerated | Initial search mode (accelerated, canonical) |
//! | `SIFT_MULTI_VALUE_FIELDS` | birthdate,date-start,end-date | Fields whose comma-separated values are sent as repeated parameters |
//! | `SIFT_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `SIFT_DEBUG_FILTER` | true | Ask the backend to return the filter it executed |
//! | `SIFT_LOG_LEVEL` | info | Log level |
//!
//! # Example
//!
//! ```rust
//! use sift_client::ClientConfig;
//!
//! let config = ClientConfig {
//!     backend_url: "http://fhir-search.internal:3100".to_string(),
//!     request_timeout: 10,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use sift_search::{DEFAULT_MULTI_VALUE_FIELDS, MultiValueExpander, SearchMode};
use url::Url;

/// Configuration for talking to a search backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "sift")]
#[command(about = "FHIR search explorer")]
pub struct ClientConfig {
    /// Backend base URL.
    #[arg(long, env = "SIFT_BACKEND_URL", default_value = "http://127.0.0.1:3100")]
    pub backend_url: String,

    /// Search endpoint path under the backend URL.
    #[arg(long, env = "SIFT_SEARCH_PATH", default_value = "fhir")]
    pub search_path: String,

    /// Inspection endpoint path under the backend URL.
    #[arg(long, env = "SIFT_INSPECT_PATH", default_value = "inspect")]
    pub inspect_path: String,

    /// Root URL of the per-resource field configuration documents.
    #[arg(
        long,
        env = "SIFT_FIELD_CONFIG_URL",
        default_value = "http://127.0.0.1:3000/fhir-config"
    )]
    pub field_config_url: String,

    /// Local directory of field configuration documents. Takes precedence
    /// over the URL when set.
    #[arg(long, env = "SIFT_FIELD_CONFIG_DIR")]
    pub field_config_dir: Option<PathBuf>,

    /// Initial search mode.
    #[arg(long = "search-mode", env = "SIFT_SEARCH_MODE", default_value = "accelerated")]
    pub search_mode: SearchMode,

    /// Fields whose comma-separated values are sent as repeated parameters.
    #[arg(
        long,
        env = "SIFT_MULTI_VALUE_FIELDS",
        value_delimiter = ',',
        default_value = "birthdate,date-start,end-date"
    )]
    pub multi_value_fields: Vec<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "SIFT_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Ask the backend to return the filter it executed.
    #[arg(long, env = "SIFT_DEBUG_FILTER", default_value = "true", action = ArgAction::Set)]
    pub debug_filter: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SIFT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:3100".to_string(),
            search_path: "fhir".to_string(),
            inspect_path: "inspect".to_string(),
            field_config_url: "http://127.0.0.1:3000/fhir-config".to_string(),
            field_config_dir: None,
            search_mode: SearchMode::Accelerated,
            multi_value_fields: DEFAULT_MULTI_VALUE_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            request_timeout: 30,
            debug_filter: true,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration from environment variables alone.
    pub fn from_env() -> Self {
        // Ignore the process arguments, which belong to the host binary
        Self::try_parse_from(["sift"]).unwrap_or_default()
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// The multi-value expander for the configured field list.
    pub fn expander(&self) -> MultiValueExpander {
        MultiValueExpander::new(
            self.multi_value_fields
                .iter()
                .map(|f| f.trim())
                .filter(|f| !f.is_empty()),
        )
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = Url::parse(&self.backend_url) {
            errors.push(format!("Invalid backend URL '{}': {}", self.backend_url, e));
        }

        if self.field_config_dir.is_none() {
            if let Err(e) = Url::parse(&self.field_config_url) {
                errors.push(format!(
                    "Invalid field config URL '{}': {}",
                    self.field_config_url, e
                ));
            }
        }

        if self.search_path.trim_matches('/').is_empty() {
            errors.push("Search path cannot be empty".to_string());
        }

        if self.inspect_path.trim_matches('/').is_empty() {
            errors.push("Inspect path cannot be empty".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration pointed at a local test backend.
    pub fn for_testing(backend_url: &str) -> Self {
        let backend_url = backend_url.trim_end_matches('/');
        Self {
            backend_url: backend_url.to_string(),
            field_config_url: format!("{}/fhir-config", backend_url),
            request_timeout: 5,
            log_level: "debug".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.search_path, "fhir");
        assert_eq!(config.search_mode, SearchMode::Accelerated);
        assert!(config.debug_filter);
        assert!(config.expander().is_multi_value("date-start"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let config = ClientConfig::try_parse_from([
            "sift",
            "--backend-url",
            "http://search.local:8000",
            "--search-mode",
            "canonical",
            "--multi-value-fields",
            "birthdate, issued",
            "--debug-filter",
            "false",
        ])
        .unwrap();

        assert_eq!(config.backend_url, "http://search.local:8000");
        assert_eq!(config.search_mode, SearchMode::Canonical);
        assert!(!config.debug_filter);

        let expander = config.expander();
        assert!(expander.is_multi_value("issued"));
        assert!(!expander.is_multi_value("date-start"));
    }

    #[test]
    fn test_validate_invalid_values() {
        let config = ClientConfig {
            backend_url: "not a url".to_string(),
            request_timeout: 0,
            search_path: "/".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("backend URL")));
        assert!(errors.iter().any(|e| e.contains("timeout")));
    }

    #[test]
    fn test_local_config_dir_skips_url_check() {
        let config = ClientConfig {
            field_config_url: "".to_string(),
            field_config_dir: Some(PathBuf::from("config")),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_testing() {
        let config = ClientConfig::for_testing("http://127.0.0.1:4321/");
        assert_eq!(config.backend_url, "http://127.0.0.1:4321");
        assert_eq!(config.field_config_url, "http://127.0.0.1:4321/fhir-config");
        assert_eq!(config.request_timeout, 5);
    }
}
