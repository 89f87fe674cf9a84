//! Error types and response classification for the World Anvil API client.

mod classify;
mod error;

pub use classify::classify;
pub use error::{ValidationDetail, WorldAnvilError, WorldAnvilResult};
