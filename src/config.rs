use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::similarity::DedupeParams;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub dedupe: DedupeConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DedupeConfig {
    /// Edge threshold in (0, 1]; validated by the engine, not here.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,
    #[serde(default = "default_body_weight")]
    pub body_weight: f64,
    #[serde(default = "default_edit_distance_cutoff")]
    pub edit_distance_cutoff: usize,
    #[serde(default = "default_shingle_size")]
    pub shingle_size: usize,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            title_weight: default_title_weight(),
            body_weight: default_body_weight(),
            edit_distance_cutoff: default_edit_distance_cutoff(),
            shingle_size: default_shingle_size(),
        }
    }
}

impl DedupeConfig {
    /// Similarity knobs for the engine, decoupled from file config.
    pub fn params(&self) -> DedupeParams {
        DedupeParams {
            title_weight: self.title_weight,
            body_weight: self.body_weight,
            edit_distance_cutoff: self.edit_distance_cutoff,
            shingle_size: self.shingle_size,
        }
    }
}

fn default_threshold() -> f64 {
    0.8
}
fn default_title_weight() -> f64 {
    0.4
}
fn default_body_weight() -> f64 {
    0.6
}
fn default_edit_distance_cutoff() -> usize {
    1000
}
fn default_shingle_size() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    #[serde(default = "default_reports_dir")]
    pub dir: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: default_reports_dir(),
        }
    }
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("./reports")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
