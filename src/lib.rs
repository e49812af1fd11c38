pub mod error;
pub mod tokenizer;
pub mod dictionary;
pub mod masking;
pub mod patterns;
pub mod template;
pub mod dict_parser;
pub mod drain_adapter;
pub mod timestamp_formats;
pub mod timestamp;
pub mod format;
pub mod line;
pub mod file;
pub mod monge;
pub mod differ;
pub mod output;
pub mod config;

pub use config::RunConfig;
pub use dict_parser::DictParser;
pub use differ::{compare, DiffEntry, DiffKind, DiffSummary, Differ};
pub use drain_adapter::DrainParser;
pub use error::{Error, Result};
pub use file::{LogFile, LogLoader};
pub use line::LogLine;
pub use monge::BitonicMongeArray;
pub use template::{ParserKind, PatternId, TemplateParser};
pub use timestamp::{Timestamp, TimestampExtractor};
