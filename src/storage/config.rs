//! Configuration handling for WBS CLI
//!
//! Configuration is stored in `.wbs/config.toml` (project) and
//! `~/.config/wbs/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::DEFAULT_GENERATOR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Edge handling policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgePolicy {
    /// Treat the edge set as a proper set: reject duplicate parent/child
    /// pairs on `wbs edge add` and drop duplicates when loading a snapshot
    pub dedupe: bool,
}

impl Default for EdgePolicy {
    fn default() -> Self {
        Self { dedupe: true }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Generator name stamped into export files
    pub generator: Option<String>,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    /// Edge handling policy
    pub edges: EdgePolicy,

    /// Export settings
    pub export: ExportConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Generator name for exports when the project does not set one
    pub generator: Option<String>,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "wbs", "wbs-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".wbs").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for a `.wbs/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let wbs_dir = current.join(".wbs");
            if wbs_dir.is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if duplicate parent/child pairs are rejected
    pub fn dedupe_edges(&self) -> bool {
        self.project.edges.dedupe
    }

    /// Returns the effective generator name for exports
    ///
    /// Project setting wins over global; the built-in name is the fallback.
    pub fn generator(&self) -> String {
        self.project
            .export
            .generator
            .clone()
            .or_else(|| self.global.generator.clone())
            .unwrap_or_else(|| DEFAULT_GENERATOR.to_string())
    }
}
