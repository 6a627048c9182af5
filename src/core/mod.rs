//! Core error type shared by every stage of the corpus pipeline.
//!
//! Unmapped characters are not errors: they encode to the
//! UNK sentinel (see [`crate::data::vocab`]). Everything here is a genuine
//! failure the caller has to handle.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for corpus loading, batching, sampling and codec repair.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raw bytes were not valid in the fixed source encoding.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The corpus is too short to fill a single batch.
    #[error(
        "Not enough data: {available} codes give n_batches = {n_batches}, \
         at least {required} codes are required (try a smaller batch_size?)"
    )]
    InsufficientData {
        n_batches: usize,
        required: usize,
        available: usize,
    },

    /// A size, count or weight was out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Every weight kept by top-k truncation was zero.
    #[error("Degenerate distribution: the top {top_n} weights sum to zero")]
    DegenerateDistribution { top_n: usize },

    /// No candidate encoding could decode the file.
    #[error(
        "Could not decode {} with any candidate encoding (tried: {})",
        path.display(),
        attempted.join(", ")
    )]
    CodecExhausted {
        path: PathBuf,
        attempted: Vec<&'static str>,
    },

    /// The encoding cannot be used as an output encoding.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// The decoded text holds characters the target encoding cannot represent.
    #[error("{} contains characters not representable in {encoding}", path.display())]
    Unencodable {
        path: PathBuf,
        encoding: &'static str,
    },

    /// An alphabet snapshot does not match the codes the alphabet would assign.
    #[error("Invalid alphabet snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CorpusError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type CorpusResult<T> = Result<T, CorpusError>;
