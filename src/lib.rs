pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, OmdbClient};
pub use config::BotConfig;
pub use core::{
    candidates::CandidateRepository, command::Command, coordinator::Coordinator,
    poll::PollEngine,
};
pub use utils::error::{MovieNightError, Result};
