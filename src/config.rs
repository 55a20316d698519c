use serde::Deserialize;
use std::fs;
use thiserror::Error;

use crate::analyzer::AnnotateOptions;
use crate::model::PageRequest;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub input: String,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub emphasis: String,
    pub idempotent: bool,
    pub fragment: bool,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub pages: Vec<PageConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            emphasis: "bolder".to_string(),
            idempotent: true,
            fragment: false,
            user_agent: concat!("viz-annotator/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 10,
            pages: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            emphasis: self.emphasis.clone(),
            idempotent: self.idempotent,
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.pages
            .iter()
            .map(|p| PageRequest {
                input: p.input.clone(),
                output: p.output.clone(),
            })
            .collect()
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Json {
        path: path.to_string(),
        source,
    })
}

pub fn parse_config(content: &str) -> Result<AppConfig, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.emphasis, "bolder");
        assert!(config.idempotent);
        assert!(!config.fragment);
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.pages.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"{
                "emphasis": "bold",
                "idempotent": false,
                "fragment": true,
                "user_agent": "test/1.0",
                "timeout_seconds": 3,
                "pages": [
                    { "input": "a.html", "output": "out/a.html" },
                    { "input": "https://example.org/b" }
                ]
            }"#,
        )
        .unwrap();

        let options = config.annotate_options();
        assert_eq!(options.emphasis, "bold");
        assert!(!options.idempotent);

        let requests = config.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].output.as_deref(), Some("out/a.html"));
        assert!(requests[1].is_remote());
        assert_eq!(requests[1].output, None);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_config("{ \"emphasis\": 3 }").is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config("/nonexistent/viz-annotator.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
