use std::path::PathBuf;

use thiserror::Error;

/// 库内统一错误类型。查询类操作（未知位置、未知 k-mer）不会走到这里，
/// 它们总是返回空结果。
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error(
        "position {position} out of bounds: window of {len} bases exceeds reference length {reference_len}"
    )]
    PositionOutOfBounds {
        position: usize,
        len: usize,
        reference_len: usize,
    },

    #[error("read '{name}' has {len} bases, cannot take a seed of length {seed_length}")]
    SeedTooShort {
        name: String,
        len: usize,
        seed_length: usize,
    },

    #[error("invalid k-mer size: {0}")]
    InvalidKmerSize(usize),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read FASTA stream: {0}")]
    Stream(#[source] std::io::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl MapperError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
