use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use crate::differ::{DiffEntry, DiffKind};
use crate::error::Result;
use crate::file::LogFile;
use crate::template::TemplateParser;

/// One line of a template report, in LogHub's structured-log column layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRow {
    #[serde(rename = "LineId")]
    pub line_id: usize,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "EventId")]
    pub event_id: String,
    #[serde(rename = "Template")]
    pub template: String,
}

/// [`TemplateRow`] without the rendered template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    #[serde(rename = "LineId")]
    pub line_id: usize,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "EventId")]
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRow {
    #[serde(rename = "Line")]
    pub line: usize,
    #[serde(rename = "Kind")]
    pub kind: DiffKind,
    #[serde(rename = "Content")]
    pub content: String,
}

pub fn template_rows(file: &LogFile, parser: &dyn TemplateParser) -> Vec<TemplateRow> {
    file.lines()
        .iter()
        .map(|line| TemplateRow {
            line_id: line.line_number(),
            content: line.raw().to_string(),
            event_id: line.pattern_id().map(|id| id.to_string()).unwrap_or_default(),
            template: line.pattern(parser).unwrap_or_default(),
        })
        .collect()
}

/// Reported against the checked line when there is one, else the baseline line.
pub fn diff_rows(entries: &[DiffEntry<'_>], collapse_ok: bool) -> Vec<DiffRow> {
    entries
        .iter()
        .filter(|e| !(collapse_ok && e.kind == DiffKind::Ok))
        .filter_map(|e| {
            e.line().map(|line| DiffRow {
                line: line.line_number(),
                kind: e.kind,
                content: line.raw().to_string(),
            })
        })
        .collect()
}

pub fn write_template_csv<W: Write>(out: W, rows: &[TemplateRow]) -> Result<()> {
    write_csv(out, rows)
}

pub fn write_event_csv<W: Write>(out: W, rows: &[TemplateRow]) -> Result<()> {
    let rows: Vec<EventRow> = rows
        .iter()
        .map(|r| EventRow {
            line_id: r.line_id,
            content: r.content.clone(),
            event_id: r.event_id.clone(),
        })
        .collect();
    write_csv(out, &rows)
}

pub fn write_diff_csv<W: Write>(out: W, rows: &[DiffRow]) -> Result<()> {
    write_csv(out, rows)
}

fn write_csv<W: Write, T: Serialize>(out: W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Plain-text report: one `KIND<TAB>line<TAB>content` row per entry.
pub fn render_diff(rows: &[DiffRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{:<10}\t{}\t{}", row.kind.as_str(), row.line, row.content);
    }
    out
}
