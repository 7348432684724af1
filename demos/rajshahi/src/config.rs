//! TOML run configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use gw_core::EntityId;
use gw_monitor::{EntityStatus, MonitorConfig};
use gw_region::RegionSpec;
use gw_sim::SimConfig;

/// Used when no config path is given on the command line.
const DEFAULT_CONFIG: &str = include_str!("../rajshahi.toml");

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub sim:        SimConfig,
    pub monitor:    MonitorConfig,
    pub regions:    Vec<RegionSpec>,
    pub agents:     Vec<AgentSeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output/rajshahi"),
            sim:        SimConfig::default(),
            monitor:    MonitorConfig::default(),
            regions:    Vec::new(),
            agents:     Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn entity_names(&self) -> BTreeMap<EntityId, String> {
        self.agents.iter().map(|a| (a.id.clone(), a.name.clone())).collect()
    }
}

/// An agent's starting state.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSeed {
    pub id:     EntityId,
    pub name:   String,
    pub lat:    f64,
    pub lng:    f64,
    #[serde(default)]
    pub status: EntityStatus,
}

/// Load `path`, or the built-in Rajshahi scenario when `None`.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return toml::from_str(DEFAULT_CONFIG).context("Failed to parse built-in config");
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}
