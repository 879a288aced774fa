use log::{debug, warn};

use super::command::Command;
use crate::persistence::{PersistenceError, SaveStore};
use crate::world::{AnswerSource, Direction, MoveOutcome, TakeOutcome, Unlock, World};

const HELP: &str = "Commands: north, south, east, west, take <item>, inventory, look, \
save [slot], load [slot], saves, help, quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Failure,
    Error,
}

/// Rendered result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub tone: Tone,
    pub keep_going: bool,
}

impl Reply {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            tone,
            keep_going: true,
        }
    }
}

/// A live game: the world plus where it is saved.
pub struct Session {
    world: World,
    store: SaveStore,
    slot: String,
}

impl Session {
    pub fn new(world: World, store: SaveStore, slot: impl Into<String>) -> Self {
        Session {
            world,
            store,
            slot: slot.into(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Replaces the live world with the one saved in `slot`.
    /// On failure the current world is kept as is.
    pub fn restore(&mut self, slot: Option<&str>) -> Result<(), PersistenceError> {
        let slot = slot.unwrap_or(self.slot.as_str());
        let loaded = self.store.load(slot)?;
        self.world = loaded;
        Ok(())
    }

    pub fn execute(&mut self, command: &Command, answers: &mut dyn AnswerSource) -> Reply {
        debug!("command {:?}", command);
        match command {
            Command::Go(direction) => self.go(*direction, answers),
            Command::Take(name) => match self.world.take_item(name) {
                TakeOutcome::Taken(name) => {
                    Reply::new(Tone::Success, format!("You take the {}.", name))
                }
                TakeOutcome::Missing(name) => {
                    Reply::new(Tone::Failure, format!("There is no {} here.", name))
                }
            },
            Command::TakeNothing => Reply::new(Tone::Failure, "Take what?"),
            Command::Inventory => Reply::new(Tone::Info, self.world.player().inventory_listing()),
            Command::Look => Reply::new(Tone::Info, self.world.current_room().describe()),
            Command::Save(slot) => self.save(slot.as_deref()),
            Command::Load(slot) => self.load(slot.as_deref()),
            Command::Saves => self.list_saves(),
            Command::Help => Reply::new(Tone::Info, HELP),
            Command::Quit => Reply {
                text: "Thanks for playing!".to_string(),
                tone: Tone::Info,
                keep_going: false,
            },
            Command::Unknown(_) => Reply::new(Tone::Failure, "I don't understand that command."),
        }
    }

    /// End-of-game message, shown only once the command loop has ended.
    pub fn farewell(&self) -> Option<String> {
        if !self.world.reached_finale() {
            return None;
        }
        let finale = self.world.current_room();
        Some(format!(
            "Congratulations! You've reached the {} and completed the adventure!\nThank you for playing!",
            finale.name
        ))
    }

    fn go(&mut self, direction: Direction, answers: &mut dyn AnswerSource) -> Reply {
        match self.world.move_player(direction, answers) {
            MoveOutcome::NoExit => Reply::new(Tone::Failure, "You can't go that way."),
            MoveOutcome::PuzzleFailed => Reply::new(
                Tone::Failure,
                "That's not correct.\nThe door remains locked.",
            ),
            MoveOutcome::NeedKey { .. } => Reply::new(
                Tone::Failure,
                "The door is locked, and you need a key to unlock it.",
            ),
            MoveOutcome::Sealed => Reply::new(
                Tone::Failure,
                format!("The way {} is sealed and cannot be opened.", direction),
            ),
            MoveOutcome::Moved {
                direction,
                room,
                unlocked,
            } => {
                let mut text = match unlocked {
                    Some(Unlock::Riddle) => {
                        "Correct! The puzzle is solved.\nThe door unlocks.\n".to_string()
                    }
                    Some(Unlock::Key(key)) => format!("You use the {} to unlock the door.\n", key),
                    None => String::new(),
                };
                text.push_str(&format!("You move {} to the {}.", direction, room));
                Reply::new(Tone::Success, text)
            }
        }
    }

    fn save(&mut self, slot: Option<&str>) -> Reply {
        let slot = slot.unwrap_or(self.slot.as_str()).to_string();
        match self.store.save(&self.world, &slot) {
            Ok(_) if slot == self.slot => Reply::new(Tone::Success, "Game saved."),
            Ok(_) => Reply::new(Tone::Success, format!("Game saved to slot `{}`.", slot)),
            Err(e) => {
                warn!("save failed: {}", e);
                Reply::new(Tone::Error, format!("Could not save the game: {}", e))
            }
        }
    }

    fn load(&mut self, slot: Option<&str>) -> Reply {
        match self.restore(slot) {
            Ok(()) => Reply::new(
                Tone::Success,
                format!(
                    "Game loaded. You are in the {}.",
                    self.world.current_room().name
                ),
            ),
            Err(e) => {
                warn!("load failed: {}", e);
                Reply::new(Tone::Error, format!("Could not load the game: {}", e))
            }
        }
    }

    fn list_saves(&self) -> Reply {
        match self.store.slots() {
            Ok(slots) if slots.is_empty() => Reply::new(
                Tone::Info,
                format!("No saved games in {}.", self.store.dir().display()),
            ),
            Ok(slots) => Reply::new(Tone::Info, format!("Saved games: {}", slots.join(", "))),
            Err(e) => Reply::new(Tone::Error, format!("Could not list saved games: {}", e)),
        }
    }
}
