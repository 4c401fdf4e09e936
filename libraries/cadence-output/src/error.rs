//! Error types for the process transport

use cadence_core::TransportError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutputError>;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("No output channel given")]
    EmptyChannel,

    #[error("Failed to start {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A stream is already running")]
    Busy,
}

impl From<OutputError> for TransportError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::EmptyChannel => Self::Connect(err.to_string()),
            OutputError::Spawn { .. } | OutputError::Busy => Self::Stream(err.to_string()),
        }
    }
}
