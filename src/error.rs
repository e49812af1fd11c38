use thiserror::Error;

use crate::template::PatternId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tokenizer is not properly configured: {0}")]
    Configuration(String),
    #[error("cannot load resource {path}: {source}")]
    Resource {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line does not match any learned pattern: {0:?}")]
    UnknownPattern(String),
    #[error("unknown pattern id {0}")]
    UnknownPatternId(PatternId),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("too few timestamps in the log file ({lines} lines, none timestamped)")]
    InsufficientTimestamps { lines: usize },
    #[error("{0} was loaded without a template parser")]
    MissingParser(&'static str),
    #[error("line {line} does not match log format {format:?}")]
    Formatting { line: String, format: String },
    #[error("invalid timestamp format {0:?}")]
    TimestampFormat(String),
    #[error("matcher left row {0} unmatched")]
    UnmatchedRow(usize),
    #[error("drain operation error: {0}")]
    Drain(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
