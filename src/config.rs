// src/config.rs
//! Engine configuration with hot reload.
//!
//! TOML shape (JSON with the same keys also works):
//! ```toml
//! visibility_threshold = 0.02
//! density_floor = 1e-10
//! humidity_advisories = true
//! category_advisories = true
//! ```
//!
//! Lookup order for `load_config_default()`:
//! 1) $STORM_CONFIG_PATH
//! 2) config/storm.toml
//! 3) config/storm.json
//! 4) built-in defaults

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};
use tracing::warn;

use crate::result::VISIBILITY_THRESHOLD;

pub const ENV_CONFIG_PATH: &str = "STORM_CONFIG_PATH";
pub const DEFAULT_DENSITY_FLOOR: f64 = 1e-10;

fn default_visibility_threshold() -> f64 {
    VISIBILITY_THRESHOLD
}
fn default_density_floor() -> f64 {
    DEFAULT_DENSITY_FLOOR
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rankings and advisories at or below this are dropped.
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
    /// Gaussian densities are floored here before `ln`.
    #[serde(default = "default_density_floor")]
    pub density_floor: f64,
    #[serde(default = "default_true")]
    pub humidity_advisories: bool,
    #[serde(default = "default_true")]
    pub category_advisories: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility_threshold(),
            density_floor: default_density_floor(),
            humidity_advisories: true,
            category_advisories: true,
        }
    }
}

impl EngineConfig {
    /// Replace out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        if !(0.0..1.0).contains(&self.visibility_threshold) {
            warn!(
                value = self.visibility_threshold,
                "visibility_threshold out of range, using default"
            );
            self.visibility_threshold = default_visibility_threshold();
        }
        if !(self.density_floor.is_finite() && self.density_floor > 0.0) {
            warn!(
                value = self.density_floor,
                "density_floor must be positive, using default"
            );
            self.density_floor = default_density_floor();
        }
        self
    }
}

/// Load configuration from an explicit path (`.toml` or `.json`).
pub fn load_config_from(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading engine config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg: EngineConfig = match ext.as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON config {}", path.display()))?,
        _ => toml::from_str(&content)
            .with_context(|| format!("parsing TOML config {}", path.display()))?,
    };
    Ok(cfg.sanitized())
}

/// Resolve the config path: env var first, then the `config/` fallbacks.
pub fn config_path_default() -> Result<Option<PathBuf>> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(Some(pb));
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    for candidate in ["config/storm.toml", "config/storm.json"] {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return Ok(Some(pb));
        }
    }
    Ok(None)
}

pub fn load_config_default() -> Result<EngineConfig> {
    match config_path_default()? {
        Some(p) => load_config_from(&p),
        None => Ok(EngineConfig::default()),
    }
}

/// Hot-reload wrapper: re-reads the file when its mtime changes.
/// A missing or broken file keeps the last good config.
#[derive(Debug)]
pub struct HotReloadConfig {
    path: Option<PathBuf>,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: EngineConfig,
    last_modified: Option<SystemTime>,
}

impl HotReloadConfig {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            inner: RwLock::new(State {
                config: EngineConfig::default(),
                last_modified: None,
            }),
        }
    }

    /// Watch the default path (see module docs); defaults if none exists.
    pub fn from_env() -> Self {
        match config_path_default() {
            Ok(path) => Self::new(path),
            Err(e) => {
                warn!(error = %e, "engine config path unusable, using defaults");
                Self::new(None)
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn current(&self) -> EngineConfig {
        let Some(path) = self.path.as_deref() else {
            return self.read_state().config;
        };

        let mtime = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return self.read_state().config,
        };

        if self.read_state().last_modified == Some(mtime) {
            return self.read_state().config;
        }

        let mut guard = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Another caller may have reloaded while we waited.
        if guard.last_modified != Some(mtime) {
            match load_config_from(path) {
                Ok(cfg) => guard.config = cfg,
                Err(e) => warn!(error = %e, "engine config reload failed, keeping previous"),
            }
            guard.last_modified = Some(mtime);
        }
        guard.config
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        match self.inner.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
