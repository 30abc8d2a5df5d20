use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::config::Config;
use crate::hits::HitCounter;
use crate::rate_limit::RateLimiter;

/// Everything a connection needs, shared by all of them through an `Arc`.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    /// Canonical form of `config.static_files.root`.
    pub root: PathBuf,
    pub limiter: RateLimiter,
    pub hits: HitCounter,
}

impl ServerState {
    /// Canonicalizes the content root and sets up empty shared stores.
    pub fn new(config: Config) -> Result<Self> {
        let configured = &config.static_files.root;
        if !configured.is_dir() {
            bail!("Directory '{}' does not exist", configured.display());
        }
        let root = configured
            .canonicalize()
            .with_context(|| format!("resolving content root {}", configured.display()))?;

        let hits = HitCounter::new(config.simulation.hit_delay());

        Ok(Self {
            config,
            root,
            limiter: RateLimiter::default(),
            hits,
        })
    }
}
