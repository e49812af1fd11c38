use crate::error::{Error, Result};

/// Splits lines into tokens on any of a set of separator strings, trimming
/// discardable characters from both ends of every piece.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    separators: Vec<String>,
    discardable: Vec<char>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators.extend(
            separators
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty()),
        );
        self
    }

    pub fn with_discardable(mut self, symbols: &str) -> Self {
        self.discardable = symbols.chars().collect();
        self
    }

    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// Tokens borrow from `line`; empty pieces are dropped.
    pub fn tokenize<'a>(&self, line: &'a str) -> Result<Vec<&'a str>> {
        if self.separators.is_empty() {
            return Err(Error::Configuration("no separator was provided".into()));
        }

        let mut tokens = Vec::new();
        let mut piece_start = 0;
        let mut i = 0;
        while i < line.len() {
            let rest = &line[i..];
            if let Some(sep) = self.separators.iter().find(|s| rest.starts_with(s.as_str())) {
                self.push_piece(&line[piece_start..i], &mut tokens);
                i += sep.len();
                piece_start = i;
            } else {
                // advance one full char to stay on a boundary
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        self.push_piece(&line[piece_start..], &mut tokens);
        Ok(tokens)
    }

    fn push_piece<'a>(&self, piece: &'a str, out: &mut Vec<&'a str>) {
        let trimmed = piece.trim_matches(|c| self.discardable.contains(&c));
        if !trimmed.is_empty() {
            out.push(trimmed);
        }
    }
}
