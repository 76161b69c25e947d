use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JanitorError {
    #[error("failed to read storage directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
