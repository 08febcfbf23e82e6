use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::duration::parse_rounds;
use crate::error::{Result, TrackerError};
use crate::round_state::RoundState;

/// A parsed line of the command vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Print,
    Undo,
    Step { rounds: u64 },
    In { rounds: u64, description: String },
    Add { name: String, hp: u64 },
    Normalize,
    Afflict { name: String, rounds: u64, description: String },
    Del { name: String },
    Dmg { name: String, amount: u64 },
}

impl Command {
    /// Parse one command line. Tokens are whitespace separated; trailing
    /// description words are joined back with single spaces.
    pub fn parse(text: &str) -> Result<Command> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Err(TrackerError::UnknownCommand(String::new()));
        };

        let command = match name {
            "print" => Command::Print,
            "undo" => Command::Undo,
            "normalize" => Command::Normalize,
            "step" => {
                let rounds = match args.first() {
                    Some(token) => parse_rounds(token)?,
                    None => 1,
                };
                Command::Step { rounds }
            }
            "in" => {
                require("in", args, 2)?;
                Command::In {
                    rounds: parse_rounds(args[0])?,
                    description: args[1..].join(" "),
                }
            }
            "add" => {
                require("add", args, 2)?;
                // An entity with no hit points would already be dead.
                let hp = parse_number(args[1])?;
                if hp == 0 {
                    return Err(TrackerError::InvalidNumber(args[1].to_string()));
                }
                Command::Add {
                    name: args[0].to_string(),
                    hp,
                }
            }
            "afflict" => {
                require("afflict", args, 3)?;
                Command::Afflict {
                    name: args[0].to_string(),
                    rounds: parse_rounds(args[1])?,
                    description: args[2..].join(" "),
                }
            }
            "del" => {
                require("del", args, 1)?;
                Command::Del {
                    name: args[0].to_string(),
                }
            }
            "dmg" => {
                require("dmg", args, 2)?;
                Command::Dmg {
                    name: args[0].to_string(),
                    amount: parse_number(args[1])?,
                }
            }
            other => return Err(TrackerError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

fn require(command: &'static str, args: &[&str], expected: usize) -> Result<()> {
    if args.len() < expected {
        return Err(TrackerError::MissingArgument {
            command,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn parse_number(token: &str) -> Result<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TrackerError::InvalidNumber(token.to_string()));
    }
    token
        .parse()
        .map_err(|_| TrackerError::InvalidNumber(token.to_string()))
}

/// The mutable session: the current snapshot plus every snapshot it has
/// superseded, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub current: RoundState,
    #[serde(default)]
    pub history: Vec<RoundState>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_round(&self) -> u64 {
        self.current.round
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Parse and apply one command line, returning the messages to show.
    /// On error neither `current` nor `history` is touched.
    pub fn input(&mut self, text: &str) -> Result<Vec<String>> {
        let command = Command::parse(text)?;
        debug!(?command, round = self.current.round, "dispatching");
        self.apply(command)
    }

    pub fn apply(&mut self, command: Command) -> Result<Vec<String>> {
        let (next, messages) = match command {
            Command::Print => return Ok(vec![self.current.to_string()]),
            Command::Undo => {
                let previous = self.history.pop().ok_or(TrackerError::EmptyHistory)?;
                self.current = previous;
                debug!(round = self.current.round, depth = self.history.len(), "undone");
                return Ok(vec!["state rewound".to_string()]);
            }
            Command::Step { rounds } => self.current.step(rounds),
            Command::In { rounds, description } => {
                (self.current.add_effect(rounds, &description), Vec::new())
            }
            Command::Add { name, hp } => (self.current.add_entity(&name, hp)?, Vec::new()),
            Command::Normalize => (self.current.normalize(), Vec::new()),
            Command::Afflict {
                name,
                rounds,
                description,
            } => (
                self.current.afflict_entity(&name, rounds, &description)?,
                Vec::new(),
            ),
            Command::Del { name } => (self.current.delete_entity(&name)?, Vec::new()),
            Command::Dmg { name, amount } => {
                let (next, died) = self.current.damage_entity(&name, amount)?;
                let messages = if died {
                    vec![format!("entity {} is dead!", name)]
                } else {
                    Vec::new()
                };
                (next, messages)
            }
        };
        self.commit(next);
        Ok(messages)
    }

    fn commit(&mut self, next: RoundState) {
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.current, f)
    }
}
