use std::io;

use sct_core::MessageDecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to start delivery runtime: {0}")]
    Runtime(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("replay file is not a JSON array: {0}")]
    Array(#[source] serde_json::Error),
    #[error("message {index} in replay array: {source}")]
    Element {
        index: usize,
        #[source]
        source: MessageDecodeError,
    },
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: MessageDecodeError,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
