use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use crate::error::{Error, Result};

static ENGLISH: &str = include_str!("../dictionaries/english.txt");

/// Case-insensitive word membership over a sorted word list.
#[derive(Debug, Clone, Default)]
pub struct DictLookup {
    words: Vec<String>,
}

impl DictLookup {
    /// The bundled English word list.
    pub fn english() -> Self {
        // reading from memory cannot fail
        Self::from_reader(Cursor::new(ENGLISH)).unwrap_or_default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resource_err = |source| Error::Resource {
            path: path.display().to_string(),
            source,
        };
        let file = File::open(path).map_err(resource_err)?;
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            Error::Io(source) => resource_err(source),
            other => other,
        })
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let word = line?.trim().to_lowercase();
            if !word.is_empty() {
                words.push(word);
            }
        }
        Ok(Self::from_words(words))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        self.words
            .binary_search_by(|w| w.as_str().cmp(lowered.as_str()))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
