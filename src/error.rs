use std::io;

use thiserror::Error;

/// Errors surfaced by the piece table core.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("position {pos} is out of range for a document of size {size}")]
    OutOfRange { pos: usize, size: usize },

    #[error("out of memory while growing an append buffer")]
    OutOfMemory,

    #[error("{0} is not a regular file")]
    NotRegularFile(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
