pub mod error;
pub mod graph;
pub mod loader;
pub mod player;
pub mod types;

pub use graph::World;
pub use loader::{default_world, load_world};
pub use player::{AnswerSource, MoveOutcome, TakeOutcome, Unlock};
pub use types::Direction;

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;

    use super::AnswerSource;

    /// Answers riddles from a fixed script, then gives up.
    #[derive(Debug, Default)]
    pub struct Scripted {
        answers: VecDeque<String>,
        asked: usize,
    }

    impl Scripted {
        pub fn new<S: Into<String>>(answers: impl IntoIterator<Item = S>) -> Self {
            Scripted {
                answers: answers.into_iter().map(Into::into).collect(),
                asked: 0,
            }
        }

        pub fn none() -> Self {
            Scripted::default()
        }

        pub fn asked(&self) -> usize {
            self.asked
        }
    }

    impl AnswerSource for Scripted {
        fn answer(&mut self, _question: &str) -> Option<String> {
            self.asked += 1;
            self.answers.pop_front()
        }
    }
}
