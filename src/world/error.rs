use thiserror::Error;

use super::types::{Direction, PuzzleId, RoomId};

/// Authoring and integrity errors for a world graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("room `{0}` is defined twice")]
    DuplicateRoom(RoomId),

    #[error("puzzle `{0}` is defined twice")]
    DuplicatePuzzle(PuzzleId),

    #[error("start room `{0}` does not exist")]
    MissingStart(RoomId),

    #[error("finale room `{0}` does not exist")]
    MissingFinale(RoomId),

    #[error("exit {direction} of `{room}` leads to unknown room `{target}`")]
    UnknownRoom {
        room: RoomId,
        direction: Direction,
        target: RoomId,
    },

    #[error("lock on {direction} of `{room}` refers to unknown puzzle `{puzzle}`")]
    UnknownPuzzle {
        room: RoomId,
        direction: Direction,
        puzzle: PuzzleId,
    },

    /// A locked direction that is not also an exit.
    #[error("`{room}` locks {direction} but has no exit that way")]
    DanglingLock { room: RoomId, direction: Direction },

    /// Locked with neither a puzzle nor a key.
    #[error("lock on {direction} of `{room}` has no puzzle or key and can never open")]
    UnresolvableLock { room: RoomId, direction: Direction },
}
