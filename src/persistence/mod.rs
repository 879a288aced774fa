//! Save/load of whole-world snapshots.
//!
//! - One JSON file per named slot inside the save directory
//! - Versioned envelope around the world arena
//! - Atomic replace on save (temp file in the same directory, then rename)
//! - Snapshots are validated on load, so a bad file never becomes a live world

pub mod error;
pub mod store;

pub use error::PersistenceError;
pub use store::{SaveStore, DEFAULT_SLOT};
