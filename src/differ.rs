use std::fmt;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RunConfig;
use crate::error::Result;
use crate::file::{open, LogFile, LogLoader};
use crate::line::LogLine;
use crate::template::TemplateParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffKind {
    /// Present in both files.
    Ok,
    /// Only in the baseline.
    Missing,
    /// Only in the checked file.
    Additional,
}

impl DiffKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffKind::Ok => "OK",
            DiffKind::Missing => "MISSING",
            DiffKind::Additional => "ADDITIONAL",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffEntry<'a> {
    pub kind: DiffKind,
    pub checked: Option<&'a LogLine>,
    pub baseline: Option<&'a LogLine>,
}

impl<'a> DiffEntry<'a> {
    /// The line the entry is reported against: the checked line when there is one.
    pub fn line(&self) -> Option<&'a LogLine> {
        self.checked.or(self.baseline)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub ok: usize,
    pub missing: usize,
    pub additional: usize,
}

impl DiffSummary {
    pub fn from_entries(entries: &[DiffEntry<'_>]) -> Self {
        entries.iter().fold(Self::default(), |mut s, e| {
            match e.kind {
                DiffKind::Ok => s.ok += 1,
                DiffKind::Missing => s.missing += 1,
                DiffKind::Additional => s.additional += 1,
            }
            s
        })
    }

    pub fn is_clean(&self) -> bool {
        self.missing == 0 && self.additional == 0
    }
}

/// Owns the state of one baseline/checked comparison: the template parser
/// and the loader whose timestamp formats rank themselves as lines parse.
pub struct Differ {
    parser: Box<dyn TemplateParser>,
    loader: LogLoader,
}

impl Differ {
    pub fn new(parser: Box<dyn TemplateParser>) -> Self {
        Self {
            parser,
            loader: LogLoader::new(),
        }
    }

    pub fn from_config(config: &RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: config.parser_type.build(config)?,
            loader: LogLoader::from_config(config)?,
        })
    }

    pub fn with_loader(mut self, loader: LogLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn parser(&self) -> &dyn TemplateParser {
        self.parser.as_ref()
    }

    pub fn loader(&self) -> &LogLoader {
        &self.loader
    }

    /// Learns both inputs with the shared parser before any template is
    /// resolved, so equal lines get equal ids across files.
    pub fn load_pair<B, C>(&mut self, baseline: B, checked: C) -> Result<(LogFile, LogFile)>
    where
        B: BufRead,
        C: BufRead,
    {
        let mut baseline = self.loader.learn(baseline, self.parser.as_mut())?;
        let mut checked = self.loader.learn(checked, self.parser.as_mut())?;
        baseline.resolve_templates(self.parser.as_mut())?;
        checked.resolve_templates(self.parser.as_mut())?;
        debug!(
            baseline = baseline.len(),
            checked = checked.len(),
            templates = self.parser.patterns_amount(),
            "comparison inputs loaded"
        );
        Ok((baseline, checked))
    }

    pub fn load_pair_paths(
        &mut self,
        baseline: impl AsRef<Path>,
        checked: impl AsRef<Path>,
    ) -> Result<(LogFile, LogFile)> {
        let baseline = open(baseline.as_ref())?;
        let checked = open(checked.as_ref())?;
        self.load_pair(baseline, checked)
    }

    pub fn compare<'a>(
        &self,
        baseline: &'a LogFile,
        checked: &'a LogFile,
    ) -> Result<Vec<DiffEntry<'a>>> {
        compare(baseline, checked)
    }
}

/// Aligns two tagged files and classifies every line of the longer one.
///
/// The longer file drives (checked on a tie): each of its lines is OK when
/// it found a counterpart, otherwise ADDITIONAL (checked drives) or MISSING
/// (baseline drives). Entries follow the driving file's line order.
///
/// Only the driving file is reported. When a template occurs more often in
/// the shorter file, its surplus lines there have no entry: a baseline with
/// three `disk full` lines against a longer checked file holding one yields
/// a single OK and no MISSING for the other two.
pub fn compare<'a>(baseline: &'a LogFile, checked: &'a LogFile) -> Result<Vec<DiffEntry<'a>>> {
    let entries: Vec<DiffEntry<'a>> = if checked.len() >= baseline.len() {
        let matched = checked.match_with(baseline)?;
        checked
            .lines()
            .iter()
            .zip(matched)
            .map(|(line, other)| DiffEntry {
                kind: if other.is_some() { DiffKind::Ok } else { DiffKind::Additional },
                checked: Some(line),
                baseline: other,
            })
            .collect()
    } else {
        let matched = baseline.match_with(checked)?;
        baseline
            .lines()
            .iter()
            .zip(matched)
            .map(|(line, other)| DiffEntry {
                kind: if other.is_some() { DiffKind::Ok } else { DiffKind::Missing },
                checked: other,
                baseline: Some(line),
            })
            .collect()
    };

    let summary = DiffSummary::from_entries(&entries);
    debug!(
        ok = summary.ok,
        missing = summary.missing,
        additional = summary.additional,
        "comparison finished"
    );
    Ok(entries)
}
