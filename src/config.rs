//! TOML settings with built-in defaults.
//!
//! Lookup order, first existing file wins:
//! 1. `--config PATH` (must exist)
//! 2. `$DEVRHYTHM_CONFIG`
//! 3. `<config dir>/devrhythm/config.toml`
//! 4. `./.devrhythm.toml`

use crate::error::{PulseError, Result};
use crate::metrics::{self, ImpactWeights, MetricsConfig, Zone};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "DEVRHYTHM_CONFIG";
pub const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub metrics: MetricsSettings,
    pub remote: RemoteSettings,
    pub time: TimeSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub session_gap_minutes: u64,
    pub top_files_limit: usize,
    pub languages_limit: usize,
    pub impact: ImpactSettings,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            session_gap_minutes: (metrics::SESSION_GAP_MS / 60_000) as u64,
            top_files_limit: metrics::TOP_FILES_LIMIT,
            languages_limit: metrics::LANGUAGES_LIMIT,
            impact: ImpactSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactSettings {
    pub commit_weight: u64,
    pub file_weight: u64,
    pub day_weight: u64,
    pub scale: f64,
    pub ceiling: u32,
}

impl Default for ImpactSettings {
    fn default() -> Self {
        let w = ImpactWeights::default();
        Self {
            commit_weight: w.commit_weight,
            file_weight: w.file_weight,
            day_weight: w.day_weight,
            scale: w.scale,
            ceiling: w.ceiling,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub api_base: String,
    pub per_page: u32,
    pub max_repo_pages: u32,
    pub max_repos: usize,
    pub commit_pages: u32,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API.to_string(),
            per_page: 100,
            max_repo_pages: 30,
            max_repos: 60,
            commit_pages: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    pub zone: String,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            zone: "local".to_string(),
        }
    }
}

impl Settings {
    pub fn parse(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads the first config file found, or defaults when there is none.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        for candidate in discover_config_files() {
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }
        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PulseError::Config(format!("Failed to read {}: {e}", path.display())))?;
        let settings = Self::parse(&contents)
            .map_err(|e| PulseError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("loaded config from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.metrics;
        if m.session_gap_minutes == 0 {
            return Err(PulseError::Config("metrics.session_gap_minutes must be positive".to_string()));
        }
        if m.top_files_limit == 0 || m.languages_limit == 0 {
            return Err(PulseError::Config("metrics limits must be positive".to_string()));
        }
        if !m.impact.scale.is_finite() || m.impact.scale < 0.0 {
            return Err(PulseError::Config("metrics.impact.scale must be a non-negative number".to_string()));
        }
        let r = &self.remote;
        if r.per_page == 0 || r.max_repo_pages == 0 || r.max_repos == 0 || r.commit_pages == 0 {
            return Err(PulseError::Config("remote caps must be positive".to_string()));
        }
        self.zone()?;
        Ok(())
    }

    pub fn metrics_config(&self) -> MetricsConfig {
        let m = &self.metrics;
        MetricsConfig {
            session_gap_ms: i64::try_from(m.session_gap_minutes)
                .unwrap_or(i64::MAX)
                .saturating_mul(60_000),
            top_files_limit: m.top_files_limit,
            languages_limit: m.languages_limit,
            impact: ImpactWeights {
                commit_weight: m.impact.commit_weight,
                file_weight: m.impact.file_weight,
                day_weight: m.impact.day_weight,
                scale: m.impact.scale,
                ceiling: m.impact.ceiling,
            },
        }
    }

    pub fn zone(&self) -> Result<Zone> {
        self.time.zone.parse().map_err(PulseError::Config)
    }
}

fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = env::var(CONFIG_ENV) {
        paths.push(PathBuf::from(env_path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("devrhythm").join("config.toml"));
    }
    paths.push(PathBuf::from("./.devrhythm.toml"));

    log::debug!("config discovery paths: {paths:?}");
    paths
}
