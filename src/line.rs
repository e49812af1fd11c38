use std::collections::BTreeMap;

use crate::error::Result;
use crate::format::LogFormat;
use crate::template::{PatternId, TemplateParser};
use crate::timestamp::{Timestamp, TimestampExtractor};

/// One physical line of a log file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    raw: String,
    line_number: usize,
    content: String,
    metadata: BTreeMap<String, String>,
    pattern_id: Option<PatternId>,
    timestamp: Timestamp,
}

impl LogLine {
    /// `line_number` is 1-based. Without a parser the line carries no
    /// template and cannot take part in cross-file matching. A parser that
    /// cannot name the template while learning leaves it pending until
    /// [`LogFile::resolve_templates`](crate::file::LogFile::resolve_templates).
    pub fn new(
        raw: impl Into<String>,
        line_number: usize,
        format: &LogFormat,
        extractor: &mut TimestampExtractor,
        parser: Option<&mut dyn TemplateParser>,
    ) -> Result<Self> {
        let raw = raw.into();
        let formatted = format.match_line(&raw)?;
        let timestamp = extractor.extract(&formatted.content);

        let pattern_id = match parser {
            Some(parser) => parser.learn_line(&raw)?,
            None => None,
        };

        Ok(Self {
            raw,
            line_number,
            content: formatted.content,
            metadata: formatted.fields,
            pattern_id,
            timestamp,
        })
    }

    /// A line with no layout, no template and a fresh extractor.
    pub fn plain(raw: impl Into<String>, line_number: usize) -> Result<Self> {
        Self::new(
            raw,
            line_number,
            &LogFormat::basic(),
            &mut TimestampExtractor::new(),
            None,
        )
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The line after the layout fields were taken off.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }

    pub fn pattern_id(&self) -> Option<PatternId> {
        self.pattern_id
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn epoch(&self) -> Option<f64> {
        self.timestamp.epoch()
    }

    pub fn non_timestamp_content(&self) -> &str {
        self.timestamp.non_timestamp_string(&self.content)
    }

    pub fn pattern(&self, parser: &dyn TemplateParser) -> Option<String> {
        self.pattern_id.and_then(|id| parser.human_readable(id).ok())
    }

    pub(crate) fn inject_epoch(&mut self, epoch: f64) {
        self.timestamp.inject_epoch(epoch);
    }

    /// Looks the template up in a parser that has finished learning.
    pub(crate) fn resolve_pattern(&mut self, parser: &mut dyn TemplateParser) -> Result<()> {
        self.pattern_id = Some(parser.extract_pattern(&self.raw)?);
        Ok(())
    }
}
