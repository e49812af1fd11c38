use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::LogFormat;
use crate::template::ParserKind;
use crate::timestamp::TimestampExtractor;
use crate::timestamp_formats::TimestampFormat;

/// Settings for one comparison or template run.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "parser_type": "drain", "timestamp_format": "yyyy-MM-dd HH:mm:ss" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    /// Leave OK entries out of diff reports.
    pub collapse_ok: bool,
    pub debug_mode: bool,
    /// Tried before the built-in catalog. strftime or `yyyy-MM-dd` letters.
    pub timestamp_format: Option<String>,
    pub parser_type: ParserKind,
    /// Positional layout, e.g. `"<Date> <Time> <Level> -"`.
    pub line_format: Option<String>,
    /// Word list for the Dict parser; the bundled English list when unset.
    pub dictionary_path: Option<PathBuf>,
    pub drain_depth: u16,
    pub drain_similarity: f32,
    pub drain_max_children: u16,
    /// Mask IPs, UUIDs, hex and numbers before Drain clusters a line.
    pub drain_masking: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: None,
            collapse_ok: false,
            debug_mode: false,
            timestamp_format: None,
            parser_type: ParserKind::Dict,
            line_format: None,
            dictionary_path: None,
            drain_depth: 4,
            drain_similarity: 0.5,
            drain_max_children: 100,
            drain_masking: false,
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Resource {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.drain_similarity) {
            return Err(Error::Configuration(format!(
                "drain_similarity must be within 0..=1, got {}",
                self.drain_similarity
            )));
        }
        if self.drain_depth < 3 {
            return Err(Error::Configuration(format!(
                "drain_depth must be at least 3, got {}",
                self.drain_depth
            )));
        }
        Ok(())
    }

    /// A fresh extractor: hit counters are never shared between runs.
    pub fn timestamp_extractor(&self) -> Result<TimestampExtractor> {
        let extractor = TimestampExtractor::new();
        Ok(match &self.timestamp_format {
            Some(pattern) => extractor.with_format(TimestampFormat::new(pattern)?),
            None => extractor,
        })
    }

    pub fn log_format(&self) -> LogFormat {
        self.line_format
            .as_deref()
            .map(LogFormat::new)
            .unwrap_or_default()
    }
}
