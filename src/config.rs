//! Optional `riddle-house.toml` settings.
//!
//! Every key may be omitted:
//!
//! ```toml
//! save_dir = "saves"
//! default_slot = "default"
//! world = "worlds/house.toml"
//! log_file = "riddle-house.log"
//! ```
//!
//! Command-line flags override the file; the file overrides the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::persistence::DEFAULT_SLOT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON file per save slot.
    pub save_dir: PathBuf,
    /// Slot used by bare `save` / `load`.
    pub default_slot: String,
    /// World file to play instead of the bundled house.
    pub world: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            save_dir: PathBuf::from("saves"),
            default_slot: DEFAULT_SLOT.to_string(),
            world: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Reads `path`, or returns the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }
}
