use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Name of the config file searched for by [`discover_config`]
pub const CONFIG_FILE: &str = "tagpick.toml";

/// Directory (next to the config file) holding state and logs
const STATE_DIR: &str = ".tagpick";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no config file found and no platform data directory available")]
    NoDataDir,
}

/// Config plus every path it implies, made absolute.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    /// The config file in use, if any
    pub source: Option<PathBuf>,
    pub store_path: PathBuf,
    pub corpus_path: Option<PathBuf>,
    pub log_path: PathBuf,
}

/// Walk up from `start` looking for `tagpick.toml`.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Parse a config file.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the config named by `explicit`, else the nearest one above `cwd`,
/// else built-in defaults rooted in the platform data directory.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<ResolvedConfig, ConfigError> {
    let source = match explicit {
        Some(p) => Some(cwd.join(p)),
        None => discover_config(cwd),
    };
    match source {
        Some(path) => {
            let config = read_config(&path)?;
            let base = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            Ok(resolve(config, Some(path), &base, &base.join(STATE_DIR)))
        }
        None => {
            let data = dirs::data_dir().ok_or(ConfigError::NoDataDir)?.join("tagpick");
            Ok(resolve(Config::default(), None, cwd, &data))
        }
    }
}

/// Resolve relative paths in `config` against `base`; unset paths default
/// into `state_dir`.
fn resolve(config: Config, source: Option<PathBuf>, base: &Path, state_dir: &Path) -> ResolvedConfig {
    let store_path = match &config.storage.path {
        Some(p) => base.join(p),
        None => state_dir.join("state.json"),
    };
    let log_path = match &config.log.file {
        Some(p) => base.join(p),
        None => state_dir.join("tagpick.log"),
    };
    let corpus_path = config.search.corpus.as_ref().map(|p| base.join(p));
    ResolvedConfig {
        config,
        source,
        store_path,
        corpus_path,
        log_path,
    }
}
