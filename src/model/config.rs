use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::collection::DEFAULT_SEPARATOR;

/// Configuration from tagpick.toml. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a request is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of candidates per query
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// CSV tag corpus (`tag,times_used`). Relative paths resolve against the config file.
    #[serde(default)]
    pub corpus: Option<PathBuf>,
    /// Remote search endpoint, queried as `GET <endpoint>?q=<query>`. Takes
    /// precedence over `corpus` when both are set.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout for `endpoint`
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: default_debounce_ms(),
            limit: default_limit(),
            corpus: None,
            endpoint: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_limit() -> usize {
    50
}

fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            separator: default_separator(),
        }
    }
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON snapshot file. Relative paths resolve against the config file.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
