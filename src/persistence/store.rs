use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::error::PersistenceError;
use crate::world::World;

pub const DEFAULT_SLOT: &str = "default";

const FORMAT_VERSION: u32 = 1;
const MAX_SLOT_LEN: usize = 32;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format_version: u32,
    world: &'a World,
}

#[derive(Deserialize)]
struct Envelope {
    format_version: u32,
    world: serde_json::Value,
}

/// Directory of named save slots, one `<slot>.json` file each.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SaveStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: &str) -> Result<PathBuf, PersistenceError> {
        if !is_valid_slot(slot) {
            return Err(PersistenceError::InvalidSlot(slot.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", slot)))
    }

    /// Writes a snapshot of `world` into `slot`, replacing any previous one.
    pub fn save(&self, world: &World, slot: &str) -> Result<PathBuf, PersistenceError> {
        let path = self.slot_path(slot)?;
        let bytes = encode(world)?;

        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        info!("saved slot `{}` to {}", slot, path.display());
        Ok(path)
    }

    pub fn load(&self, slot: &str) -> Result<World, PersistenceError> {
        let path = self.slot_path(slot)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(slot.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let world = decode(slot, &bytes).inspect_err(|e| warn!("{}", e))?;
        info!("loaded slot `{}` from {}", slot, path.display());
        Ok(world)
    }

    /// Names of the slots currently on disk, sorted.
    pub fn slots(&self) -> Result<Vec<String>, PersistenceError> {
        let pattern = format!(
            "{}/*.json",
            glob::Pattern::escape(&self.dir.to_string_lossy())
        );
        let mut slots: Vec<String> = glob::glob(&pattern)?
            .filter_map(|e| e.ok())
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .filter(|name| is_valid_slot(name))
            .collect();
        slots.sort();
        Ok(slots)
    }
}

fn is_valid_slot(slot: &str) -> bool {
    !slot.is_empty()
        && slot.len() <= MAX_SLOT_LEN
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn encode(world: &World) -> Result<Vec<u8>, PersistenceError> {
    let snapshot = SnapshotRef {
        format_version: FORMAT_VERSION,
        world,
    };
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}

fn decode(slot: &str, bytes: &[u8]) -> Result<World, PersistenceError> {
    let corrupt = |reason: String| PersistenceError::CorruptState {
        slot: slot.to_string(),
        reason,
    };

    let envelope: Envelope = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    if envelope.format_version != FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported format version {} (expected {})",
            envelope.format_version, FORMAT_VERSION
        )));
    }
    serde_json::from_value(envelope.world).map_err(|e| corrupt(e.to_string()))
}
