use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::WorldError;
use super::player::Player;
use super::types::{Puzzle, PuzzleId, Room, RoomId};

/// The whole game state: an arena of rooms and puzzles plus the player.
///
/// Exits and locks refer to rooms and puzzles by id, so the graph may contain
/// cycles without any shared ownership. Every `World` handed out by this
/// module has passed [`World::validate`], including deserialized ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorldParts")]
pub struct World {
    pub(super) player: Player,
    pub(super) rooms: BTreeMap<RoomId, Room>,
    pub(super) puzzles: BTreeMap<PuzzleId, Puzzle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) finale: Option<RoomId>,
}

/// Unchecked form of [`World`], used on the way in from storage.
#[derive(Deserialize)]
struct WorldParts {
    player: Player,
    rooms: BTreeMap<RoomId, Room>,
    #[serde(default)]
    puzzles: BTreeMap<PuzzleId, Puzzle>,
    #[serde(default)]
    finale: Option<RoomId>,
}

impl TryFrom<WorldParts> for World {
    type Error = WorldError;

    fn try_from(parts: WorldParts) -> Result<Self, Self::Error> {
        let world = World {
            player: parts.player,
            rooms: parts.rooms,
            puzzles: parts.puzzles,
            finale: parts.finale,
        };
        world.validate()?;
        Ok(world)
    }
}

impl World {
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (&RoomId, &Room)> {
        self.rooms.iter()
    }

    #[cfg(test)]
    pub fn puzzle(&self, id: &PuzzleId) -> Option<&Puzzle> {
        self.puzzles.get(id)
    }

    /// The room the player stands in. Validation guarantees it exists.
    pub fn current_room(&self) -> &Room {
        &self.rooms[&self.player.current_room]
    }

    pub fn finale(&self) -> Option<&Room> {
        self.finale.as_ref().and_then(|id| self.rooms.get(id))
    }

    pub fn reached_finale(&self) -> bool {
        self.finale.as_ref() == Some(&self.player.current_room)
    }

    pub fn locked_exit_count(&self) -> usize {
        self.rooms.values().map(|r| r.locked_exits.len()).sum()
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if !self.rooms.contains_key(&self.player.current_room) {
            return Err(WorldError::MissingStart(self.player.current_room.clone()));
        }
        if let Some(finale) = &self.finale {
            if !self.rooms.contains_key(finale) {
                return Err(WorldError::MissingFinale(finale.clone()));
            }
        }

        for (id, room) in &self.rooms {
            for (direction, target) in &room.exits {
                if !self.rooms.contains_key(target) {
                    return Err(WorldError::UnknownRoom {
                        room: id.clone(),
                        direction: *direction,
                        target: target.clone(),
                    });
                }
            }
            for (direction, lock) in &room.locked_exits {
                if !room.exits.contains_key(direction) {
                    return Err(WorldError::DanglingLock {
                        room: id.clone(),
                        direction: *direction,
                    });
                }
                if !lock.has_gate() {
                    return Err(WorldError::UnresolvableLock {
                        room: id.clone(),
                        direction: *direction,
                    });
                }
                if let Some(puzzle) = &lock.puzzle {
                    if !self.puzzles.contains_key(puzzle) {
                        return Err(WorldError::UnknownPuzzle {
                            room: id.clone(),
                            direction: *direction,
                            puzzle: puzzle.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Assembles a [`World`] room by room, then validates the finished graph.
#[derive(Debug)]
pub struct WorldBuilder {
    player_name: String,
    start: RoomId,
    finale: Option<RoomId>,
    rooms: BTreeMap<RoomId, Room>,
    puzzles: BTreeMap<PuzzleId, Puzzle>,
}

impl WorldBuilder {
    pub fn new(player_name: impl Into<String>, start: RoomId) -> Self {
        WorldBuilder {
            player_name: player_name.into(),
            start,
            finale: None,
            rooms: BTreeMap::new(),
            puzzles: BTreeMap::new(),
        }
    }

    pub fn finale(&mut self, room: RoomId) -> &mut Self {
        self.finale = Some(room);
        self
    }

    pub fn add_puzzle(&mut self, id: PuzzleId, puzzle: Puzzle) -> Result<(), WorldError> {
        if self.puzzles.contains_key(&id) {
            return Err(WorldError::DuplicatePuzzle(id));
        }
        self.puzzles.insert(id, puzzle);
        Ok(())
    }

    pub fn add_room(&mut self, id: RoomId, room: Room) -> Result<(), WorldError> {
        if self.rooms.contains_key(&id) {
            return Err(WorldError::DuplicateRoom(id));
        }
        self.rooms.insert(id, room);
        Ok(())
    }

    pub fn build(self) -> Result<World, WorldError> {
        let world = World {
            player: Player::new(self.player_name, self.start),
            rooms: self.rooms,
            puzzles: self.puzzles,
            finale: self.finale,
        };
        world.validate()?;
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::types::{Direction, LockSpec};

    fn two_rooms() -> WorldBuilder {
        let mut hall = Room::new("Hall", "A hall.");
        hall.set_exit(Direction::North, RoomId::new("study"), None);
        let mut study = Room::new("Study", "Books.");
        study.set_exit(Direction::South, RoomId::new("hall"), None);

        let mut builder = WorldBuilder::new("Hero", RoomId::new("hall"));
        builder.add_room(RoomId::new("hall"), hall).unwrap();
        builder.add_room(RoomId::new("study"), study).unwrap();
        builder
    }

    #[test]
    fn builds_cyclic_graph() {
        let world = two_rooms().build().unwrap();
        assert_eq!(world.current_room().name, "Hall");
        assert_eq!(world.rooms().count(), 2);
        assert!(!world.reached_finale());
    }

    #[test]
    fn rejects_duplicate_room() {
        let mut builder = two_rooms();
        let err = builder
            .add_room(RoomId::new("hall"), Room::new("Hall again", ""))
            .unwrap_err();
        assert_eq!(err, WorldError::DuplicateRoom(RoomId::new("hall")));
    }

    #[test]
    fn rejects_exit_to_unknown_room() {
        let mut builder = WorldBuilder::new("Hero", RoomId::new("hall"));
        let mut hall = Room::new("Hall", "");
        hall.set_exit(Direction::East, RoomId::new("nowhere"), None);
        builder.add_room(RoomId::new("hall"), hall).unwrap();

        assert!(matches!(
            builder.build(),
            Err(WorldError::UnknownRoom { direction: Direction::East, .. })
        ));
    }

    #[test]
    fn rejects_lock_without_gate() {
        let mut builder = two_rooms();
        let mut vault = Room::new("Vault", "");
        vault.set_exit(
            Direction::West,
            RoomId::new("hall"),
            Some(LockSpec::default()),
        );
        builder.add_room(RoomId::new("vault"), vault).unwrap();

        assert_eq!(
            builder.build().unwrap_err(),
            WorldError::UnresolvableLock {
                room: RoomId::new("vault"),
                direction: Direction::West,
            }
        );
    }

    #[test]
    fn rejects_unknown_puzzle_and_missing_start() {
        let mut builder = two_rooms();
        let mut vault = Room::new("Vault", "");
        vault.set_exit(
            Direction::West,
            RoomId::new("hall"),
            Some(LockSpec::riddle(PuzzleId::new("sphinx"))),
        );
        builder.add_room(RoomId::new("vault"), vault).unwrap();
        assert!(matches!(
            builder.build(),
            Err(WorldError::UnknownPuzzle { .. })
        ));

        let builder = WorldBuilder::new("Hero", RoomId::new("attic"));
        assert_eq!(
            builder.build().unwrap_err(),
            WorldError::MissingStart(RoomId::new("attic"))
        );
    }

    #[test]
    fn deserializing_an_invalid_world_fails() {
        let json = r#"{
            "player": { "name": "Hero", "current_room": "ghost", "inventory": [] },
            "rooms": {},
            "puzzles": {}
        }"#;
        let err = serde_json::from_str::<World>(json).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
