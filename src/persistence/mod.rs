//! Leaderboard persistence
//!
//! Features:
//! - Plain JSON file, one record per leaderboard entry
//! - Atomic replace (write tmp → rename over the old file)
//! - Missing file loads as an empty leaderboard

pub mod error;
pub mod store;

pub use error::{PersistError, PersistResult};
pub use store::{JsonFileStore, LeaderboardStore, MemoryStore};
