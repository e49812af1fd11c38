use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::tokenizer::Tokenizer;

/// Positional line layout such as `"<Date> <Level> -"`.
///
/// Each `<Field>` binds the token at its position; other format words only
/// occupy a position. Tokens past the format form the line's content.
#[derive(Debug, Clone)]
pub struct LogFormat {
    format: String,
    symbols: Vec<Option<String>>,
    tokenizer: Tokenizer,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedContent {
    pub fields: BTreeMap<String, String>,
    pub content: String,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::basic()
    }
}

impl LogFormat {
    pub fn new(format: &str) -> Self {
        let tokenizer = Tokenizer::new().with_separators([" "]);
        let symbols = format
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(predefined_symbol)
            .collect();
        Self {
            format: format.to_string(),
            symbols,
            tokenizer,
        }
    }

    /// No fields; the whole line is content.
    pub fn basic() -> Self {
        Self::new("")
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbols.iter().flatten().any(|s| s == symbol)
    }

    pub fn match_line(&self, line: &str) -> Result<FormattedContent> {
        let tokens = self.tokenizer.tokenize(line)?;
        if tokens.len() < self.symbols.len() {
            return Err(Error::Formatting {
                line: line.to_string(),
                format: self.format.clone(),
            });
        }

        let fields = self
            .symbols
            .iter()
            .zip(&tokens)
            .filter_map(|(symbol, token)| symbol.as_ref().map(|s| (s.clone(), token.to_string())))
            .collect();
        let content = tokens[self.symbols.len()..].join(" ");

        Ok(FormattedContent { fields, content })
    }
}

fn predefined_symbol(word: &str) -> Option<String> {
    word.strip_prefix('<')
        .and_then(|w| w.strip_suffix('>'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
}
