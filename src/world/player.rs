use log::debug;
use serde::{Deserialize, Serialize};

use super::graph::World;
use super::types::{names_match, Direction, Item, RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub current_room: RoomId,
    #[serde(default)]
    pub inventory: Vec<Item>,
}

impl Player {
    pub fn new(name: impl Into<String>, start: RoomId) -> Self {
        Player {
            name: name.into(),
            current_room: start,
            inventory: Vec::new(),
        }
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.inventory.iter().any(|item| names_match(&item.name, name))
    }

    pub fn inventory_listing(&self) -> String {
        if self.inventory.is_empty() {
            return "You are carrying nothing.".to_string();
        }
        let mut out = String::from("You are carrying:");
        for item in &self.inventory {
            out.push_str("\n- ");
            out.push_str(&item.name);
        }
        out
    }
}

/// Supplies the answer to a riddle while a move is in progress.
///
/// Returning `None` (input closed, prompt dismissed) counts as a wrong answer.
pub trait AnswerSource {
    fn answer(&mut self, question: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unlock {
    Riddle,
    Key(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    NoExit,
    PuzzleFailed,
    NeedKey {
        key: String,
    },
    /// Locked with no usable gate; only reachable in an unvalidated world.
    Sealed,
    Moved {
        direction: Direction,
        room: String,
        unlocked: Option<Unlock>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeOutcome {
    Taken(String),
    Missing(String),
}

impl World {
    /// Tries to walk through `direction`, resolving a lock on the way.
    ///
    /// An unsolved puzzle is always tried before the key; solving it clears
    /// the lock for good. A key is checked against the inventory and kept.
    pub fn move_player(
        &mut self,
        direction: Direction,
        answers: &mut dyn AnswerSource,
    ) -> MoveOutcome {
        let Some(room) = self.rooms.get_mut(&self.player.current_room) else {
            return MoveOutcome::NoExit;
        };
        let Some(target) = room.exits.get(&direction).cloned() else {
            debug!("no exit {} from {}", direction, room.name);
            return MoveOutcome::NoExit;
        };

        let mut unlocked = None;
        if let Some(lock) = room.locked_exits.get(&direction).cloned() {
            let pending = lock
                .puzzle
                .as_ref()
                .and_then(|id| self.puzzles.get_mut(id))
                .filter(|puzzle| !puzzle.is_solved());

            if let Some(puzzle) = pending {
                let reply = answers.answer(puzzle.question());
                let solved = reply.map(|answer| puzzle.ask(&answer)).unwrap_or(false);
                if !solved {
                    debug!("riddle on {} of {} not solved", direction, room.name);
                    return MoveOutcome::PuzzleFailed;
                }
                unlocked = Some(Unlock::Riddle);
            } else if let Some(key) = lock.key {
                if !self.player.has_item(&key) {
                    return MoveOutcome::NeedKey { key };
                }
                unlocked = Some(Unlock::Key(key));
            } else if lock.puzzle.is_some() {
                // Riddle already answered at another door sharing it.
                unlocked = Some(Unlock::Riddle);
            } else {
                return MoveOutcome::Sealed;
            }

            room.locked_exits.remove(&direction);
            debug!("unlocked {} of {}", direction, room.name);
        }

        let name = self
            .rooms
            .get(&target)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| target.to_string());
        self.player.current_room = target;
        MoveOutcome::Moved {
            direction,
            room: name,
            unlocked,
        }
    }

    pub fn take_item(&mut self, name: &str) -> TakeOutcome {
        let taken = self
            .rooms
            .get_mut(&self.player.current_room)
            .and_then(|room| room.take(name));
        match taken {
            Some(item) => {
                let name = item.name.clone();
                self.player.inventory.push(item);
                TakeOutcome::Taken(name)
            }
            None => TakeOutcome::Missing(name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::graph::WorldBuilder;
    use crate::world::loader::default_world;
    use crate::world::testing::Scripted;
    use crate::world::types::{LockSpec, Puzzle, PuzzleId, Room};

    fn walk(world: &mut World, dirs: &[Direction]) {
        let mut silent = Scripted::none();
        for dir in dirs {
            assert!(matches!(
                world.move_player(*dir, &mut silent),
                MoveOutcome::Moved { .. }
            ));
        }
    }

    #[test]
    fn unknown_direction_leaves_player_in_place() {
        let mut world = default_world().unwrap();
        let mut answers = Scripted::none();
        assert_eq!(
            world.move_player(Direction::West, &mut answers),
            MoveOutcome::NoExit
        );
        assert_eq!(world.current_room().name, "Living Room");
        assert_eq!(answers.asked(), 0);
    }

    #[test]
    fn open_exits_round_the_house() {
        let mut world = default_world().unwrap();
        walk(&mut world, &[Direction::North]);
        assert_eq!(world.current_room().name, "Kitchen");
        walk(&mut world, &[Direction::South, Direction::East]);
        assert_eq!(world.current_room().name, "Bedroom");
    }

    #[test]
    fn wrong_riddle_answer_keeps_door_locked() {
        let mut world = default_world().unwrap();
        walk(&mut world, &[Direction::East]);

        let mut answers = Scripted::new(["wind"]);
        assert_eq!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::PuzzleFailed
        );
        assert_eq!(world.current_room().name, "Bedroom");
        assert!(world.current_room().is_locked(Direction::North));

        let mut answers = Scripted::new(["ECHO "]);
        assert_eq!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::Moved {
                direction: Direction::North,
                room: "Secret Room".into(),
                unlocked: Some(Unlock::Riddle),
            }
        );
    }

    #[test]
    fn solved_riddle_is_not_asked_again() {
        let mut world = default_world().unwrap();
        walk(&mut world, &[Direction::East]);
        let mut answers = Scripted::new(["echo"]);
        world.move_player(Direction::North, &mut answers);
        assert_eq!(world.current_room().name, "Secret Room");

        // The secret room has no way back, so put the player in the bedroom again.
        world.player.current_room = RoomId::new("bedroom");
        let mut answers = Scripted::none();
        assert!(matches!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::Moved { unlocked: None, .. }
        ));
        assert_eq!(answers.asked(), 0);
    }

    #[test]
    fn dismissed_prompt_counts_as_wrong() {
        let mut world = default_world().unwrap();
        walk(&mut world, &[Direction::East]);
        let mut answers = Scripted::none();
        assert_eq!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::PuzzleFailed
        );
        assert_eq!(answers.asked(), 1);
    }

    #[test]
    fn key_gate_needs_item_and_keeps_it() {
        let mut world = default_world().unwrap();
        world.player.current_room = RoomId::new("secret_room_2");

        let mut answers = Scripted::none();
        assert_eq!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::NeedKey {
                key: "Ancient Key".into()
            }
        );
        assert_eq!(world.current_room().name, "Secret Room 2");

        assert_eq!(
            world.take_item("ancient key"),
            TakeOutcome::Taken("Ancient Key".into())
        );
        assert!(matches!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::Moved {
                unlocked: Some(Unlock::Key(_)),
                ..
            }
        ));
        assert_eq!(world.current_room().name, "Treasure Chamber");
        assert!(world.player().has_item("Ancient Key"));
        assert!(world.reached_finale());
    }

    #[test]
    fn wrong_key_name_does_not_open() {
        let mut world = default_world().unwrap();
        world.player.current_room = RoomId::new("kitchen");
        assert_eq!(world.take_item("Key"), TakeOutcome::Taken("Key".into()));
        world.player.current_room = RoomId::new("secret_room_2");

        let mut answers = Scripted::none();
        assert!(matches!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::NeedKey { .. }
        ));
    }

    fn gated_by_both() -> World {
        let mut builder = WorldBuilder::new("Hero", RoomId::new("gate"));
        builder
            .add_puzzle(PuzzleId::new("sphinx"), Puzzle::new("Legs?", "man"))
            .unwrap();
        let mut gate = Room::new("Gate", "");
        gate.add_item(Item::new("Seal", "Wax."));
        gate.set_exit(
            Direction::North,
            RoomId::new("keep"),
            Some(LockSpec {
                puzzle: Some(PuzzleId::new("sphinx")),
                key: Some("Seal".into()),
            }),
        );
        gate.set_exit(
            Direction::East,
            RoomId::new("keep"),
            Some(LockSpec::riddle(PuzzleId::new("sphinx"))),
        );
        builder.add_room(RoomId::new("gate"), gate).unwrap();
        let mut keep = Room::new("Keep", "");
        keep.set_exit(Direction::South, RoomId::new("gate"), None);
        builder.add_room(RoomId::new("keep"), keep).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn puzzle_is_checked_before_key() {
        let mut world = gated_by_both();
        assert_eq!(world.take_item("seal"), TakeOutcome::Taken("Seal".into()));

        // Holding the key does not skip the riddle.
        let mut answers = Scripted::new(["woman"]);
        assert_eq!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::PuzzleFailed
        );
        assert_eq!(answers.asked(), 1);
    }

    #[test]
    fn shared_riddle_opens_its_other_door() {
        let mut world = gated_by_both();
        let mut answers = Scripted::new(["man"]);
        assert!(matches!(
            world.move_player(Direction::East, &mut answers),
            MoveOutcome::Moved { .. }
        ));
        walk(&mut world, &[Direction::South]);

        // The north lock also names a key; the solved riddle hands over to it.
        let mut answers = Scripted::none();
        assert_eq!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::NeedKey { key: "Seal".into() }
        );
        world.take_item("seal");
        assert!(matches!(
            world.move_player(Direction::North, &mut answers),
            MoveOutcome::Moved { .. }
        ));
        assert_eq!(answers.asked(), 0);
        assert_eq!(world.locked_exit_count(), 0);
    }

    #[test]
    fn take_missing_item_changes_nothing() {
        let mut world = default_world().unwrap();
        let before = world.clone();
        assert_eq!(
            world.take_item("lamp"),
            TakeOutcome::Missing("lamp".into())
        );
        assert_eq!(world, before);
    }

    #[test]
    fn inventory_listing() {
        let mut world = default_world().unwrap();
        assert_eq!(
            world.player().inventory_listing(),
            "You are carrying nothing."
        );
        walk(&mut world, &[Direction::North]);
        world.take_item("KEY");
        assert_eq!(
            world.player().inventory_listing(),
            "You are carrying:\n- Key"
        );
        assert!(world.current_room().items.is_empty());
    }
}
