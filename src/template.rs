use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::dict_parser::DictParser;
use crate::drain_adapter::DrainParser;
use crate::error::Result;

/// Stable template identifier. `parser` tells which backend allocated `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternId {
    pub parser: u32,
    pub index: u64,
}

impl PatternId {
    pub const fn new(parser: u32, index: u64) -> Self {
        Self { parser, index }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.parser, self.index)
    }
}

/// Capability set every template extractor provides. One instance is
/// scoped to a single baseline/checked comparison run.
pub trait TemplateParser {
    /// Lookup-only: the line's template must already be known.
    fn extract_pattern(&mut self, line: &str) -> Result<PatternId>;

    /// Learns the line. Backends that only name templates on lookup return
    /// `Ok(None)`; the line is resolved with `extract_pattern` once all input
    /// of the run has been learned.
    fn learn_line(&mut self, line: &str) -> Result<Option<PatternId>>;

    fn human_readable(&self, id: PatternId) -> Result<String>;

    fn patterns_amount(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    #[default]
    Dict,
    Drain,
}

impl ParserKind {
    pub fn build(self, config: &RunConfig) -> Result<Box<dyn TemplateParser>> {
        Ok(match self {
            ParserKind::Dict => match &config.dictionary_path {
                Some(path) => Box::new(DictParser::from_dictionary_path(path)?),
                None => Box::new(DictParser::english()),
            },
            ParserKind::Drain => Box::new(DrainParser::from_config(config)),
        })
    }
}
