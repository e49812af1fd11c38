use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::format::LogFormat;
use crate::line::LogLine;
use crate::monge::BitonicMongeArray;
use crate::template::{PatternId, TemplateParser};
use crate::timestamp::TimestampExtractor;

/// Builds [`LogFile`]s. The extractor's format hit counters live as long as
/// the loader, so load both files of a comparison with the same one.
#[derive(Debug, Clone, Default)]
pub struct LogLoader {
    format: LogFormat,
    extractor: TimestampExtractor,
}

impl LogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RunConfig) -> Result<Self> {
        Ok(Self {
            format: config.log_format(),
            extractor: config.timestamp_extractor()?,
        })
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_extractor(mut self, extractor: TimestampExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    pub fn extractor(&self) -> &TimestampExtractor {
        &self.extractor
    }

    /// Loads and tags every line, resolving templates the parser could not
    /// name while learning.
    pub fn load<R: BufRead>(
        &mut self,
        reader: R,
        parser: &mut dyn TemplateParser,
    ) -> Result<LogFile> {
        let mut file = self.learn(reader, parser)?;
        file.resolve_templates(parser)?;
        Ok(file)
    }

    /// Like [`load`](Self::load), but pending templates stay pending. Use
    /// when more input must be learned before ids settle.
    pub fn learn<R: BufRead>(
        &mut self,
        reader: R,
        parser: &mut dyn TemplateParser,
    ) -> Result<LogFile> {
        self.read(reader, Some(parser), |_| {})
    }

    /// Lines without templates; such a file cannot be matched.
    pub fn load_untagged<R: BufRead>(&mut self, reader: R) -> Result<LogFile> {
        self.read(reader, None, |_| {})
    }

    /// [`learn`](Self::learn) with a callback per constructed line.
    pub fn learn_with<R, F>(
        &mut self,
        reader: R,
        parser: &mut dyn TemplateParser,
        on_line: F,
    ) -> Result<LogFile>
    where
        R: BufRead,
        F: FnMut(&LogLine),
    {
        self.read(reader, Some(parser), on_line)
    }

    pub fn load_path(
        &mut self,
        path: impl AsRef<Path>,
        parser: &mut dyn TemplateParser,
    ) -> Result<LogFile> {
        let reader = open(path.as_ref())?;
        self.load(reader, parser)
    }

    fn read<R, F>(
        &mut self,
        reader: R,
        mut parser: Option<&mut dyn TemplateParser>,
        mut on_line: F,
    ) -> Result<LogFile>
    where
        R: BufRead,
        F: FnMut(&LogLine),
    {
        let mut lines = Vec::new();
        for (idx, raw) in reader.lines().enumerate() {
            let raw = raw?;
            let line = LogLine::new(
                raw,
                idx + 1,
                &self.format,
                &mut self.extractor,
                parser.as_mut().map(|p| &mut **p as &mut dyn TemplateParser),
            )?;
            on_line(&line);
            lines.push(line);
        }

        let mut file = LogFile {
            lines,
            has_parser: parser.is_some(),
        };
        file.fill_timestamps()?;
        debug!(
            lines = file.len(),
            tagged = file.has_parser,
            "log file loaded"
        );
        Ok(file)
    }
}

pub(crate) fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::Resource {
            path: path.display().to_string(),
            source,
        })
}

/// All lines of one input, in file order. Once loaded every line has an epoch.
#[derive(Debug, Clone)]
pub struct LogFile {
    lines: Vec<LogLine>,
    has_parser: bool,
}

impl LogFile {
    /// Convenience for in-memory input with default layout and timestamp rules.
    pub fn from_lines<I, S>(lines: I, parser: &mut dyn TemplateParser) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        LogLoader::new().load(text.as_bytes(), parser)
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_parser(&self) -> bool {
        self.has_parser
    }

    /// 1-based.
    pub fn line_at(&self, line_number: usize) -> Option<&LogLine> {
        line_number.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    pub fn pending_templates(&self) -> usize {
        if !self.has_parser {
            return 0;
        }
        self.lines.iter().filter(|l| l.pattern_id().is_none()).count()
    }

    /// Assigns templates to lines whose parser deferred naming them.
    pub fn resolve_templates(&mut self, parser: &mut dyn TemplateParser) -> Result<()> {
        if !self.has_parser {
            return Err(Error::MissingParser("log file"));
        }
        let mut resolved = 0usize;
        for line in self.lines.iter_mut().filter(|l| l.pattern_id().is_none()) {
            line.resolve_pattern(parser)?;
            resolved += 1;
        }
        if resolved > 0 {
            debug!(
                resolved,
                templates = parser.patterns_amount(),
                "deferred templates resolved"
            );
        }
        Ok(())
    }

    /// Lines without their own timestamp borrow the epoch of the nearest
    /// line that has one; on a tie the following line wins.
    fn fill_timestamps(&mut self) -> Result<()> {
        let direct: Vec<Option<f64>> = self
            .lines
            .iter()
            .map(|l| l.timestamp().actual_epoch())
            .collect();

        let mut previous = Vec::with_capacity(direct.len());
        let mut last = None;
        for (i, epoch) in direct.iter().enumerate() {
            if let Some(epoch) = epoch {
                last = Some((i, *epoch));
            }
            previous.push(last);
        }

        let mut injected = 0usize;
        let mut next: Option<(usize, f64)> = None;
        for i in (0..direct.len()).rev() {
            if let Some(epoch) = direct[i] {
                next = Some((i, epoch));
                continue;
            }
            let epoch = match (previous[i], next) {
                (Some((p, before)), Some((n, after))) => {
                    if n - i <= i - p {
                        after
                    } else {
                        before
                    }
                }
                (Some((_, before)), None) => before,
                (None, Some((_, after))) => after,
                (None, None) => {
                    return Err(Error::InsufficientTimestamps {
                        lines: self.lines.len(),
                    })
                }
            };
            self.lines[i].inject_epoch(epoch);
            injected += 1;
        }

        if injected > 0 {
            debug!(injected, "timestamps borrowed from neighbouring lines");
        }
        Ok(())
    }

    /// For each line of `self`, the line of `checked` it corresponds to.
    ///
    /// Lines are bucketed by template and each bucket is aligned by time.
    /// Templates present in only one file stay unmatched. The result is
    /// indexed by `self`'s line number minus one.
    pub fn match_with<'a>(&self, checked: &'a LogFile) -> Result<Vec<Option<&'a LogLine>>> {
        if !self.has_parser {
            return Err(Error::MissingParser("matched file"));
        }
        if !checked.has_parser {
            return Err(Error::MissingParser("counterpart file"));
        }

        let mut buckets: AHashMap<PatternId, (Vec<&LogLine>, Vec<&'a LogLine>)> =
            AHashMap::new();
        for line in &self.lines {
            let id = line.pattern_id().ok_or(Error::MissingParser("matched file"))?;
            buckets.entry(id).or_default().0.push(line);
        }
        for line in &checked.lines {
            let id = line.pattern_id().ok_or(Error::MissingParser("counterpart file"))?;
            buckets.entry(id).or_default().1.push(line);
        }

        let mut result = vec![None; self.lines.len()];
        for (id, (own, other)) in &buckets {
            if own.is_empty() || other.is_empty() {
                continue;
            }
            trace!(template = %id, own = own.len(), other = other.len(), "aligning bucket");

            if own.len() <= other.len() {
                let matrix = BitonicMongeArray::new(own, other, epoch_distance)?;
                for (red, (_, blue)) in own.iter().zip(matrix.perfmatch_complete()?) {
                    result[red.line_number() - 1] = Some(*blue);
                }
            } else {
                let matrix = BitonicMongeArray::new(other, own, epoch_distance)?;
                for (red, (_, blue)) in other.iter().zip(matrix.perfmatch_complete()?) {
                    result[blue.line_number() - 1] = Some(*red);
                }
            }
        }

        Ok(result)
    }
}

fn epoch_distance(a: &&LogLine, b: &&LogLine) -> f64 {
    (a.epoch().unwrap_or_default() - b.epoch().unwrap_or_default()).abs()
}
