use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_FILE_ENV: &str = "BEACON_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on connections being handled at the same time.
    pub max_workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub document_root: PathBuf,
    /// A request is served only if its User-Agent contains one of these.
    pub allowed_agents: Vec<String>,
    pub server_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:80".to_string(),
            max_workers: 10,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("./html"),
            allowed_agents: vec![
                "curl".to_string(),
                "Firefox".to_string(),
                "HTTPie".to_string(),
            ],
            server_name: format!("Beacon/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Defaults, then the file named by `BEACON_CONFIG`, then the `LISTEN`,
    /// `MAX_WORKERS` and `DOC_ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_FILE_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(addr) = std::env::var("LISTEN") {
            self.server.listen_addr = addr;
        }

        if let Ok(max) = std::env::var("MAX_WORKERS") {
            self.server.max_workers = max
                .parse()
                .with_context(|| format!("MAX_WORKERS must be a positive integer, got {max:?}"))?;
        }

        if let Some(root) = std::env::var_os("DOC_ROOT") {
            self.site.document_root = PathBuf::from(root);
        }

        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.listen_addr.trim().is_empty() {
            anyhow::bail!("server.listen_addr must not be empty");
        }
        if self.server.max_workers == 0 {
            anyhow::bail!("server.max_workers must be at least 1");
        }
        Ok(())
    }
}
