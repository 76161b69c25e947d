//! DeckBot Janitor - retention sweeper for downloaded decks
//!
//! This crate is organized into:
//! - clock: time source and interval sleeping
//! - store: the flat artifact directory and its entries
//! - sweep: a single scan-and-evict pass
//! - worker: the cancellable Scanning/Sleeping loop around it

mod error;

pub mod clock;
pub mod store;
pub mod sweep;
pub mod worker;

pub use clock::{Clock, SystemClock};
pub use error::JanitorError;
pub use store::{ArtifactDir, ArtifactEntry, EntryKind, LocalDir};
pub use sweep::{SweepReport, is_expired, sweep_once};
pub use worker::{Janitor, JanitorConfig, JanitorHandle, JanitorPhase};
