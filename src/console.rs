use log::warn;
use std::io::{self, BufRead, Write};

use crate::interpreter::{Command, Session};
use crate::world::AnswerSource;

pub enum StartChoice {
    New,
    Load,
}

/// Line-oriented front end over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Prints `> ` and reads one line. `None` at end of input.
    fn prompt(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn choose_start(&mut self) -> io::Result<StartChoice> {
        writeln!(
            self.output,
            "Do you want to start a new game or load a saved game? (new/load)"
        )?;
        let choice = self.prompt()?.unwrap_or_default();
        Ok(if choice.eq_ignore_ascii_case("load") {
            StartChoice::Load
        } else {
            StartChoice::New
        })
    }

    /// Runs commands until `quit` or end of input, then prints the farewell.
    pub fn run(&mut self, session: &mut Session) -> io::Result<()> {
        let welcome = format!("Welcome to Riddle House, {}!", session.world().player().name);
        self.say(&welcome)?;
        let here = format!("You are in the {}.", session.world().current_room().name);
        self.say(&here)?;

        loop {
            let Some(line) = self.prompt()? else {
                self.say("")?;
                break;
            };
            let command = Command::parse(&line);
            let reply = session.execute(&command, self);
            self.say(&reply.text)?;
            if !reply.keep_going {
                break;
            }
        }

        if let Some(farewell) = session.farewell() {
            self.say(&farewell)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> AnswerSource for Console<R, W> {
    fn answer(&mut self, question: &str) -> Option<String> {
        let asked = self
            .say("The door is locked. You need to solve a puzzle to open it.")
            .and_then(|_| self.say(question))
            .and_then(|_| self.prompt());
        match asked {
            Ok(answer) => answer,
            Err(e) => {
                warn!("could not read an answer: {}", e);
                None
            }
        }
    }
}
