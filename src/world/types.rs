use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable key of a room inside the world arena.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        RoomId(id.into())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PuzzleId(String);

impl PuzzleId {
    pub fn new(id: impl Into<String>) -> Self {
        PuzzleId(id.into())
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Direction::ALL.into_iter().find(|d| d.as_str() == s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive name comparison used for items and keys.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A riddle guarding one or more doors. Once solved it stays solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    question: String,
    solution: String,
    #[serde(default)]
    solved: bool,
}

impl Puzzle {
    pub fn new(question: impl Into<String>, solution: impl Into<String>) -> Self {
        Puzzle {
            question: question.into(),
            solution: solution.into(),
            solved: false,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Checks an answer, trimmed and case-folded. A wrong answer never clears `solved`.
    pub fn ask(&mut self, answer: &str) -> bool {
        let correct = answer.trim().to_lowercase() == self.solution.trim().to_lowercase();
        if correct {
            self.solved = true;
        }
        correct
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Item {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

/// Gating metadata attached to a locked exit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<PuzzleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl LockSpec {
    pub fn riddle(puzzle: PuzzleId) -> Self {
        LockSpec {
            puzzle: Some(puzzle),
            key: None,
        }
    }

    /// A lock with no gate at all can never be opened by play.
    pub fn has_gate(&self) -> bool {
        self.puzzle.is_some() || self.key.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub exits: BTreeMap<Direction, RoomId>,
    #[serde(default)]
    pub locked_exits: BTreeMap<Direction, LockSpec>,
}

impl Room {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Room {
            name: name.into(),
            description: description.into(),
            items: Vec::new(),
            exits: BTreeMap::new(),
            locked_exits: BTreeMap::new(),
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Registers an exit. Passing a lock also records it in `locked_exits`;
    /// re-registering a direction without one drops any previous lock.
    pub fn set_exit(&mut self, direction: Direction, target: RoomId, lock: Option<LockSpec>) {
        self.exits.insert(direction, target);
        match lock {
            Some(lock) => {
                self.locked_exits.insert(direction, lock);
            }
            None => {
                self.locked_exits.remove(&direction);
            }
        }
    }

    pub fn is_locked(&self, direction: Direction) -> bool {
        self.locked_exits.contains_key(&direction)
    }

    pub fn open_exits(&self) -> impl Iterator<Item = Direction> + '_ {
        self.exits.keys().copied().filter(|d| !self.is_locked(*d))
    }

    /// Removes and returns the first item whose name matches.
    pub fn take(&mut self, name: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.is_named(name))?;
        Some(self.items.remove(index))
    }

    pub fn describe(&self) -> String {
        let items = if self.items.is_empty() {
            "none".to_string()
        } else {
            self.items
                .iter()
                .map(|item| item.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let exits = self
            .open_exits()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let locked = self
            .locked_exits
            .keys()
            .map(|d| format!("{} (locked)", d))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{}\n\n{}\n\nItems: {}\nExits: {}\nLocked Exits: {}",
            self.name, self.description, items, exits, locked
        )
    }
}
