use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a log number was refused by `select`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidLogNumber {
    #[error("log number must be greater than 0")]
    Zero,
    #[error("log number exceeds count ({requested} > {count})")]
    ExceedsCount { requested: u32, count: u32 },
}

#[derive(Error, Debug)]
pub enum LogError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("bad log number: {0}")]
    InvalidLogNumber(#[from] InvalidLogNumber),
    #[error("cannot seek to offset {offset}: {source}")]
    Seek {
        offset: u64,
        #[source]
        source: io::Error,
    },
    #[error("file close error: {0}")]
    Close(#[source] io::Error),
    #[error("no log selected")]
    NoLogSelected,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LogError>;
