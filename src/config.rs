//! Server configuration.
//!
//! Values come from three layers, lowest precedence first: built-in
//! defaults, an optional YAML file, and environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported at startup only. Every accepted connection gets its own task.
    pub max_workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Content root. Normally supplied on the command line.
    pub root: PathBuf,
    /// Servable extensions, lowercase with a leading dot (".html").
    pub allowed_extensions: Vec<String>,
}

/// Artificial delays that model a loaded backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Sleep after admission, before the request is read.
    pub pre_read_delay_ms: u64,
    /// Sleep inside the hit counter's critical section.
    pub hit_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            max_workers: 16,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            allowed_extensions: [".html", ".png", ".pdf"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pre_read_delay_ms: 500,
            hit_delay_ms: 100,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Reads a YAML file, then applies the process environment on top.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut cfg = Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let mut cfg: Config = serde_yaml::from_str(text)?;
        cfg.static_files.allowed_extensions =
            normalize_extensions(cfg.static_files.allowed_extensions.iter().map(String::as_str));
        Ok(cfg)
    }

    /// Applies `HOST`, `PORT`, `MAX_WORKERS`, `ALLOWED_EXTENSIONS`,
    /// `PRE_READ_DELAY_MS` and `HIT_DELAY_MS` as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value {port:?}"))?;
        }
        if let Some(workers) = lookup("MAX_WORKERS") {
            self.server.max_workers = workers
                .trim()
                .parse()
                .with_context(|| format!("invalid MAX_WORKERS value {workers:?}"))?;
        }
        if let Some(exts) = lookup("ALLOWED_EXTENSIONS") {
            self.static_files.allowed_extensions = normalize_extensions(exts.split(','));
        }
        if let Some(ms) = lookup("PRE_READ_DELAY_MS") {
            self.simulation.pre_read_delay_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("invalid PRE_READ_DELAY_MS value {ms:?}"))?;
        }
        if let Some(ms) = lookup("HIT_DELAY_MS") {
            self.simulation.hit_delay_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("invalid HIT_DELAY_MS value {ms:?}"))?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl StaticFilesConfig {
    /// `ext` is compared case-insensitively, with or without its dot.
    pub fn is_allowed(&self, ext: &str) -> bool {
        let wanted = normalize_extension(ext);
        self.allowed_extensions.iter().any(|e| *e == wanted)
    }
}

impl SimulationConfig {
    pub fn pre_read_delay(&self) -> Duration {
        Duration::from_millis(self.pre_read_delay_ms)
    }

    pub fn hit_delay(&self) -> Duration {
        Duration::from_millis(self.hit_delay_ms)
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') { ext } else { format!(".{ext}") }
}

fn normalize_extensions<'a>(exts: impl Iterator<Item = &'a str>) -> Vec<String> {
    exts.filter(|e| !e.trim().is_empty())
        .map(normalize_extension)
        .collect()
}
