//! Round-by-round encounter tracker: entities with hit points, timed
//! effects, and snapshot based undo.

pub mod config;
pub mod duration;
pub mod effect;
pub mod entity;
pub mod error;
pub mod persist;
pub mod round_state;
pub mod state;

pub use config::SessionConfig;
pub use duration::parse_rounds;
pub use effect::Effect;
pub use entity::Entity;
pub use error::{Result, TrackerError};
pub use round_state::RoundState;
pub use state::{Command, State};
