use std::path::Path;

use crate::dictionary::DictLookup;
use crate::error::{Error, Result};
use crate::masking::{HEX_NUMBER, NUMBER, SYMBOL, WORD};
use crate::patterns::{Pattern, PatternNode, PatternRegistry};
use crate::template::{PatternId, TemplateParser};
use crate::tokenizer::Tokenizer;

pub const DICT_PARSER_ID: u32 = 0;

const SEPARATORS: [&str; 4] = [" ", "\t", ",", "="];
const DISCARDABLE: &str = ",.[]<>?:;";

/// Dictionary-driven template extractor.
///
/// Each token is classified in strict priority order: number, hex number,
/// dictionary word, generic word, symbol run, and finally a free parameter.
/// Learned patterns live in a registry owned by this parser instance.
#[derive(Debug, Clone)]
pub struct DictParser {
    dictionary: DictLookup,
    registry: PatternRegistry,
    tokenizer: Tokenizer,
}

impl DictParser {
    pub fn new(dictionary: DictLookup) -> Self {
        Self {
            dictionary,
            registry: PatternRegistry::new(),
            tokenizer: Tokenizer::new()
                .with_separators(SEPARATORS)
                .with_discardable(DISCARDABLE),
        }
    }

    pub fn english() -> Self {
        Self::new(DictLookup::english())
    }

    pub fn from_dictionary_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(DictLookup::from_path(path)?))
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn classify(&self, token: &str) -> PatternNode {
        if NUMBER.is_match(token) {
            PatternNode::Regex(NUMBER)
        } else if HEX_NUMBER.is_match(token) {
            PatternNode::Regex(HEX_NUMBER)
        } else if self.dictionary.contains(token) {
            PatternNode::Word(token.to_string())
        } else if WORD.is_match(token) {
            PatternNode::Regex(WORD)
        } else if SYMBOL.is_match(token) {
            PatternNode::Regex(SYMBOL)
        } else {
            PatternNode::Param
        }
    }

    pub fn extract_pattern_from_line(&self, line: &str) -> Result<Pattern> {
        let tokens = self.tokenizer.tokenize(line)?;
        Ok(Pattern::new(tokens.into_iter().map(|t| self.classify(t)).collect()))
    }

    pub fn put_pattern(&mut self, pattern: Pattern) -> PatternId {
        PatternId::new(DICT_PARSER_ID, self.registry.put(pattern) as u64)
    }

    pub fn pattern_id(&self, pattern: &Pattern) -> Option<PatternId> {
        self.registry
            .find(pattern)
            .map(|idx| PatternId::new(DICT_PARSER_ID, idx as u64))
    }

    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        if id.parser != DICT_PARSER_ID {
            return None;
        }
        usize::try_from(id.index).ok().and_then(|idx| self.registry.get(idx))
    }
}

impl TemplateParser for DictParser {
    fn extract_pattern(&mut self, line: &str) -> Result<PatternId> {
        let pattern = self.extract_pattern_from_line(line)?;
        self.pattern_id(&pattern)
            .ok_or_else(|| Error::UnknownPattern(line.to_string()))
    }

    fn learn_line(&mut self, line: &str) -> Result<Option<PatternId>> {
        let pattern = self.extract_pattern_from_line(line)?;
        Ok(Some(self.put_pattern(pattern)))
    }

    fn human_readable(&self, id: PatternId) -> Result<String> {
        self.pattern(id)
            .map(Pattern::human_readable)
            .ok_or(Error::UnknownPatternId(id))
    }

    fn patterns_amount(&self) -> usize {
        self.registry.len()
    }
}
