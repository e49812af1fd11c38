use chrono::{DateTime, NaiveDate, Utc};
use tracing::trace;

use crate::timestamp_formats::{TimestampFormat, TimestampFormats};

/// At most this many leading tokens are considered part of a timestamp.
pub const MAX_TIMESTAMP_TOKENS: usize = 6;

const SURROUNDINGS: [(char, char); 4] = [('[', ']'), ('(', ')'), ('{', '}'), ('<', '>')];

/// A successful parse: the epoch and the exact text that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEpoch {
    pub epoch: f64,
    pub source: String,
    /// Byte offset in the scanned text where the non-timestamp part begins.
    pub rest_start: usize,
}

/// Timestamp of one log line. `epoch` prefers the injected value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timestamp {
    source: String,
    actual_epoch: Option<f64>,
    injected_epoch: Option<f64>,
    rest_start: usize,
}

impl Timestamp {
    pub fn from_extracted(extracted: Option<ExtractedEpoch>) -> Self {
        match extracted {
            Some(e) => Self {
                source: e.source,
                actual_epoch: Some(e.epoch),
                injected_epoch: None,
                rest_start: e.rest_start,
            },
            None => Self::default(),
        }
    }

    /// The text that parsed; empty when the line had no timestamp.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn actual_epoch(&self) -> Option<f64> {
        self.actual_epoch
    }

    pub fn injected_epoch(&self) -> Option<f64> {
        self.injected_epoch
    }

    pub fn inject_epoch(&mut self, epoch: f64) {
        self.injected_epoch = Some(epoch);
    }

    pub fn epoch(&self) -> Option<f64> {
        self.injected_epoch.or(self.actual_epoch)
    }

    /// `content` with the timestamp and everything before it removed.
    /// Must be the same text the timestamp was extracted from.
    pub fn non_timestamp_string<'a>(&self, content: &'a str) -> &'a str {
        content.get(self.rest_start..).unwrap_or("").trim_start()
    }
}

/// Finds the leading timestamp of a line.
///
/// Candidates are prefixes of the whitespace-separated tokens, longest
/// first, each optionally with one pair of surrounding brackets removed.
/// A candidate is tried against the explicit format (if any), then the
/// catalog in hit-count order, then as a bare number.
#[derive(Debug, Clone)]
pub struct TimestampExtractor {
    explicit: Option<TimestampFormat>,
    formats: TimestampFormats,
    today: NaiveDate,
}

impl Default for TimestampExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampExtractor {
    pub fn new() -> Self {
        Self {
            explicit: None,
            formats: TimestampFormats::builtin(),
            today: Utc::now().date_naive(),
        }
    }

    pub fn with_format(mut self, format: TimestampFormat) -> Self {
        self.explicit = Some(format);
        self
    }

    /// Date used to fill in fields a format does not carry.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn formats(&self) -> &TimestampFormats {
        &self.formats
    }

    pub fn explicit_format(&self) -> Option<&TimestampFormat> {
        self.explicit.as_ref()
    }

    pub fn extract_epoch(&mut self, content: &str) -> Option<ExtractedEpoch> {
        let spans = token_spans(content);
        for candidate in candidates(content, &spans) {
            if let Some(epoch) = self.parse_candidate(&candidate.text) {
                trace!(source = %candidate.text, epoch, "timestamp found");
                return Some(ExtractedEpoch {
                    epoch,
                    source: candidate.text,
                    rest_start: candidate.rest_start,
                });
            }
        }
        None
    }

    pub fn extract(&mut self, content: &str) -> Timestamp {
        Timestamp::from_extracted(self.extract_epoch(content))
    }

    fn parse_candidate(&mut self, candidate: &str) -> Option<f64> {
        if let Some(explicit) = self.explicit.as_mut() {
            if let Some(epoch) = explicit.parse(candidate, self.today) {
                return Some(epoch);
            }
        }
        let today = self.today;
        for format in self.formats.ranked() {
            if let Some(epoch) = format.parse(candidate, today) {
                return Some(epoch);
            }
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(candidate) {
            return Some(stamp.timestamp_millis() as f64);
        }
        candidate.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub text: String,
    pub rest_start: usize,
}

pub(crate) fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Longest prefix first; for each prefix the raw text, then bracket-stripped variants.
pub(crate) fn candidates(text: &str, spans: &[(usize, usize)]) -> Vec<Candidate> {
    let max = spans.len().min(MAX_TIMESTAMP_TOKENS);
    let mut out = Vec::new();
    for count in (1..=max).rev() {
        let prefix = spans[..count]
            .iter()
            .map(|&(s, e)| &text[s..e])
            .collect::<Vec<_>>()
            .join(" ");
        let rest_start = spans[count - 1].1;

        let bracketed =
            prefix.contains(|c: char| SURROUNDINGS.iter().any(|&(a, b)| c == a || c == b));
        let stripped: Vec<String> = if bracketed {
            SURROUNDINGS
                .iter()
                .filter_map(|&(open, close)| {
                    prefix.strip_prefix(open)?.strip_suffix(close).map(str::to_string)
                })
                .filter(|inner| inner.len() > 2)
                .collect()
        } else {
            Vec::new()
        };

        out.push(Candidate { text: prefix, rest_start });
        out.extend(stripped.into_iter().map(|text| Candidate { text, rest_start }));
    }
    out
}
