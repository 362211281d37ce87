//! Server and client configuration.
//!
//! Values come from built-in defaults, then an optional YAML file, then
//! environment overrides.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Where a client connects. Passed explicitly to whatever opens a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory files are served from
    pub root: PathBuf,
    /// Seconds a kept-alive connection may sit without sending a byte
    pub idle_timeout_secs: u64,
    /// Request path -> `Location` answered with 301
    pub redirects: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            root: PathBuf::from("files"),
            idle_timeout_secs: 10,
            redirects: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Loads from the process environment.
    ///
    /// `SERVER_CONFIG` names a YAML file; `SERVE_ROOT` and `IDLE_TIMEOUT`
    /// override single fields.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Like [`ServerConfig::load`] with a custom variable lookup.
    pub fn load_from(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match var("SERVER_CONFIG") {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {path}"))?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };

        if let Some(root) = var("SERVE_ROOT") {
            cfg.root = PathBuf::from(root);
        }
        if let Some(secs) = var("IDLE_TIMEOUT") {
            cfg.idle_timeout_secs = secs
                .parse()
                .with_context(|| format!("IDLE_TIMEOUT is not a number of seconds: {secs:?}"))?;
        }

        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("parsing server config")
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub target: Target,
    /// Where fetched files are written
    pub download_dir: PathBuf,
    /// Consecutive failed exchanges tolerated for one path
    pub max_attempts: u32,
    /// Redirects followed for one user-supplied path
    pub max_redirects: u32,
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            download_dir: PathBuf::from("."),
            max_attempts: 10,
            max_redirects: 10,
            reconnect_delay: Duration::from_millis(100),
        }
    }

    /// `DOWNLOAD_DIR` overrides the download directory.
    pub fn load(target: Target) -> Self {
        Self::load_from(target, |key| std::env::var(key).ok())
    }

    pub fn load_from(target: Target, var: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::new(target);
        if let Some(dir) = var("DOWNLOAD_DIR") {
            cfg.download_dir = PathBuf::from(dir);
        }
        cfg
    }
}
