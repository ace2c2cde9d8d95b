pub mod cleaner;
pub mod config;
pub mod error;
pub mod roster;
pub mod stats;
pub mod xlsx;

pub use config::TournamentConfig;
pub use error::{Result, StatsError};
pub use roster::{Participant, Roster, NA_SENTINEL};
