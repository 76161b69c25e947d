//! DeckBot Slides - SlidesGPT API access
//!
//! - client: submit a generation job and download the finished deck
//! - poll: bounded polling until the deck is ready, then persist it
//! - artifact: file naming inside the storage directory

mod error;

pub mod artifact;
pub mod client;
pub mod poll;

pub use artifact::{artifact_file_name, save_artifact};
pub use client::{Download, JobId, SlidesClient};
pub use error::SlidesError;
pub use poll::PollPolicy;
