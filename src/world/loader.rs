use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::graph::{World, WorldBuilder};
use super::types::{Direction, Item, LockSpec, Puzzle, PuzzleId, Room, RoomId};

const HOUSE: &str = include_str!("../../worlds/house.toml");

#[derive(Debug, Deserialize)]
pub struct WorldFile {
    pub player: PlayerSpec,
    #[serde(default)]
    pub puzzles: BTreeMap<String, PuzzleSpec>,
    pub rooms: BTreeMap<String, RoomSpec>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerSpec {
    #[serde(default = "default_player_name")]
    pub name: String,
    pub start: String,
    #[serde(default)]
    pub finale: Option<String>,
}

fn default_player_name() -> String {
    "Hero".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PuzzleSpec {
    pub question: String,
    pub solution: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    #[serde(default)]
    pub exits: Vec<ExitSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ExitSpec {
    pub direction: Direction,
    pub to: String,
    #[serde(default)]
    pub puzzle: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    /// Forces a lock even without a gate; such a world is rejected.
    #[serde(default)]
    pub locked: bool,
}

impl ExitSpec {
    fn lock(&self) -> Option<LockSpec> {
        if !self.locked && self.puzzle.is_none() && self.key.is_none() {
            return None;
        }
        Some(LockSpec {
            puzzle: self.puzzle.clone().map(PuzzleId::new),
            key: self.key.clone(),
        })
    }
}

pub fn load_world(path: &Path) -> Result<World> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading world file {}", path.display()))?;
    parse_world(&content).with_context(|| format!("building world from {}", path.display()))
}

pub fn default_world() -> Result<World> {
    parse_world(HOUSE).context("building the bundled house")
}

pub fn parse_world(content: &str) -> Result<World> {
    let file: WorldFile = toml::from_str(content)?;
    build_world(file)
}

pub fn build_world(file: WorldFile) -> Result<World> {
    let mut builder = WorldBuilder::new(file.player.name, RoomId::new(file.player.start));
    if let Some(finale) = file.player.finale {
        builder.finale(RoomId::new(finale));
    }

    for (id, spec) in file.puzzles {
        builder.add_puzzle(PuzzleId::new(id), Puzzle::new(spec.question, spec.solution))?;
    }

    for (id, spec) in file.rooms {
        let mut room = Room::new(spec.name, spec.description);
        for item in spec.items {
            room.add_item(Item::new(item.name, item.description));
        }
        for exit in &spec.exits {
            if room.exits.contains_key(&exit.direction) {
                bail!("room `{}` declares exit {} twice", id, exit.direction);
            }
            room.set_exit(exit.direction, RoomId::new(exit.to.clone()), exit.lock());
        }
        builder.add_room(RoomId::new(id), room)?;
    }

    Ok(builder.build()?)
}
