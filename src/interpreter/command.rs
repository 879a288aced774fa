use crate::world::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(Direction),
    Take(String),
    /// `take` with nothing after it.
    TakeNothing,
    Inventory,
    Look,
    Save(Option<String>),
    Load(Option<String>),
    Saves,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses one line of input. Matching ignores case and surrounding whitespace.
    pub fn parse(line: &str) -> Self {
        let line = line.trim().to_lowercase();
        if let Some(direction) = Direction::parse(&line) {
            return Command::Go(direction);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line.as_str(), ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match (verb, argument) {
            ("take", Some(name)) => Command::Take(name),
            ("take", None) => Command::TakeNothing,
            ("inventory", None) => Command::Inventory,
            ("look", None) => Command::Look,
            ("save", slot) => Command::Save(slot),
            ("load", slot) => Command::Load(slot),
            ("saves", None) => Command::Saves,
            ("help", None) => Command::Help,
            ("quit", None) => Command::Quit,
            _ => Command::Unknown(line.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_and_verbs() {
        assert_eq!(Command::parse("  NORTH "), Command::Go(Direction::North));
        assert_eq!(Command::parse("west"), Command::Go(Direction::West));
        assert_eq!(Command::parse("Inventory"), Command::Inventory);
        assert_eq!(Command::parse("look"), Command::Look);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("saves"), Command::Saves);
    }

    #[test]
    fn take_keeps_multi_word_names() {
        assert_eq!(
            Command::parse("take   Ancient Key "),
            Command::Take("ancient key".into())
        );
        assert_eq!(Command::parse("take"), Command::TakeNothing);
        assert_eq!(Command::parse("take    "), Command::TakeNothing);
    }

    #[test]
    fn save_and_load_take_optional_slot() {
        assert_eq!(Command::parse("save"), Command::Save(None));
        assert_eq!(
            Command::parse("LOAD Chapter2"),
            Command::Load(Some("chapter2".into()))
        );
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(Command::parse("dance"), Command::Unknown("dance".into()));
        assert_eq!(Command::parse("look around"), Command::Unknown("look around".into()));
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
        assert_eq!(Command::parse("up"), Command::Unknown("up".into()));
    }
}
