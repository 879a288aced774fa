use thiserror::Error;

/// Failures of the save/load gateway. None of them touch the live world.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No snapshot exists under the requested slot.
    #[error("no saved game in slot `{0}`")]
    NotFound(String),

    /// The slot exists but does not hold a usable snapshot.
    #[error("saved game in slot `{slot}` is corrupt: {reason}")]
    CorruptState { slot: String, reason: String },

    #[error("invalid slot name `{0}` (use 1-32 letters, digits, `-` or `_`)")]
    InvalidSlot(String),

    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("bad save directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
