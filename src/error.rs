//! Fatal error taxonomy shared by the dispatcher, workers and both CLIs.
use std::path::PathBuf;

use thiserror::Error;

/// The five fatal error kinds of the core: usage, I/O, resource, transport
/// and protocol violations. Every run aborts on the first one encountered;
/// there is no retry and no partial recovery.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad CLI invocation: missing files, contradictory flags, `--workers 0`.
    #[error("{0}")]
    Usage(String),

    /// Cannot open/read/write a file, or a short read where the format
    /// requires more.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Allocation failure for buffers, signal vectors or aggregate tables.
    #[error("resource error: {0}")]
    Resource(String),

    /// Send/recv failure on the worker transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol violation: out-of-range tau, duplicate write, unexpected
    /// message shape.
    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Every fatal error maps to the same exit code; only the message tells
    /// the category apart, per spec.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
