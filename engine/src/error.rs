use thiserror::Error;

/// Validation failures raised while interpreting a command or applying it
/// to a round snapshot. None of them are fatal; the session is left as it
/// was before the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("unrecognized command `{0}`")]
    UnknownCommand(String),

    #[error("command `{command}` requires {expected} argument(s), got {got}")]
    MissingArgument {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("unrecognized unit of time `{0}` (expected one of r, s, m, h, d, y)")]
    InvalidDurationUnit(String),

    #[error("seconds {0} is not divisible by 10")]
    NonDivisibleSeconds(u64),

    #[error("entity with name {0} already exists")]
    DuplicateEntity(String),

    #[error("no entity with name {0} exists")]
    UnknownEntity(String),

    #[error("nothing to undo")]
    EmptyHistory,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
