pub mod config;
pub mod path_utils;

pub use crate::config::AppConfig;

use tracing::info;

pub fn init() {
    info!("🎞️ DeckBot core initialized");
}
