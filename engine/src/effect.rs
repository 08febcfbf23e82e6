use std::fmt;

use serde::{Deserialize, Serialize};

/// A timed status. `end_round` is absolute within the owning round snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub description: String,
    /// Duration in rounds as requested when the effect was created.
    pub duration: u64,
    /// First round at which the effect is considered over.
    pub end_round: u64,
}

impl Effect {
    pub fn new(description: impl Into<String>, duration: u64, end_round: u64) -> Self {
        Self {
            description: description.into(),
            duration,
            end_round,
        }
    }

    /// Check the effect against `round`. Returns `(expired, message)`; the
    /// message is empty while the effect is still running.
    pub fn step(&self, round: u64) -> (bool, String) {
        if round >= self.end_round {
            (true, format!("EFFECT: {}", self.description))
        } else {
            (false, String::new())
        }
    }

    /// Shift the expiry back by `offset` rounds.
    ///
    /// Saturates at 0 for a hand-edited state whose effect ended before
    /// `offset`.
    pub fn normalize(&self, offset: u64) -> Self {
        Self {
            description: self.description.clone(),
            duration: self.duration,
            end_round: self.end_round.saturating_sub(offset),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.end_round, self.description)
    }
}
