use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8090";

/// Settings read from the optional TOML config file.
///
/// ```toml
/// root = "dist"
/// ignore = ["dist/vendor"]
/// listen = "0.0.0.0:8090"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// directory searched for sourcemaps
    pub root: Option<PathBuf>,
    /// path prefixes skipped while searching
    pub ignore: Vec<String>,
    /// bind address of the HTTP server
    pub listen: Option<String>,
}

impl Config {
    /// Loads the config file, or the defaults if no file was given.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Config::default()),
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// The search root, command line first.
    pub fn root(&self, arg: Option<&Path>) -> PathBuf {
        arg.or(self.root.as_deref())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The ignored prefixes from the file followed by those from the
    /// command line.
    pub fn ignore(&self, args: &[String]) -> Vec<String> {
        self.ignore.iter().chain(args).cloned().collect()
    }

    /// The bind address, command line first.
    pub fn listen(&self, arg: Option<&str>) -> String {
        arg.or(self.listen.as_deref())
            .unwrap_or(DEFAULT_LISTEN)
            .to_string()
    }
}
