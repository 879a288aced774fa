pub mod command;
pub mod session;

pub use command::Command;
pub use session::{Reply, Session, Tone};
