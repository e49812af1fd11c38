use logdiff::differ::compare;
use logdiff::file::LogFile;
use logdiff::output::{
    diff_rows, render_diff, template_rows, write_diff_csv, write_event_csv, write_template_csv,
};
use logdiff::{DiffKind, DictParser};

fn sample(parser: &mut DictParser) -> LogFile {
    LogFile::from_lines(
        [
            "2020-01-01 12:00:00 Got response 404 from server",
            "2020-01-01 12:00:01 user a, b",
        ],
        parser,
    )
    .unwrap()
}

#[test]
fn template_rows_carry_id_and_rendering() {
    let mut parser = DictParser::english();
    let file = sample(&mut parser);
    let rows = template_rows(&file, &parser);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].line_id, 1);
    assert_eq!(rows[0].event_id, "0-0");
    assert_eq!(rows[0].template, "<Param> <Param> Got response <Number> from server");
    assert_eq!(rows[1].event_id, "0-1");
}

#[test]
fn template_csv_has_loghub_header_and_quotes_commas() {
    let mut parser = DictParser::english();
    let file = sample(&mut parser);
    let rows = template_rows(&file, &parser);

    let mut out = Vec::new();
    write_template_csv(&mut out, &rows).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("LineId,Content,EventId,Template"));
    assert_eq!(
        lines.next(),
        Some(concat!(
            "1,2020-01-01 12:00:00 Got response 404 from server,0-0,",
            "<Param> <Param> Got response <Number> from server"
        ))
    );
    assert!(lines.next().unwrap().starts_with("2,\"2020-01-01 12:00:01 user a, b\",0-1,"));
}

#[test]
fn event_csv_omits_template_column() {
    let mut parser = DictParser::english();
    let file = sample(&mut parser);
    let rows = template_rows(&file, &parser);

    let mut out = Vec::new();
    write_event_csv(&mut out, &rows).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().next(), Some("LineId,Content,EventId"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn diff_report_collapses_ok_rows_on_request() {
    let mut parser = DictParser::english();
    let baseline = LogFile::from_lines(["2020-01-01 12:00:00 disk full"], &mut parser).unwrap();
    let checked = LogFile::from_lines(
        ["2020-01-01 12:00:00 disk full", "2020-01-01 12:00:04 server is down"],
        &mut parser,
    )
    .unwrap();
    let entries = compare(&baseline, &checked).unwrap();

    let all = diff_rows(&entries, false);
    assert_eq!(all.len(), 2);

    let collapsed = diff_rows(&entries, true);
    assert_eq!(collapsed.len(), 1);
    assert_eq!(collapsed[0].kind, DiffKind::Additional);
    assert_eq!(collapsed[0].line, 2);

    let text = render_diff(&collapsed);
    assert!(text.starts_with("ADDITIONAL"));
    assert!(text.trim_end().ends_with("2020-01-01 12:00:04 server is down"));

    let mut out = Vec::new();
    write_diff_csv(&mut out, &all).unwrap();
    let csv = String::from_utf8(out).unwrap();
    assert_eq!(csv.lines().next(), Some("Line,Kind,Content"));
    assert_eq!(csv.lines().nth(1), Some("1,OK,2020-01-01 12:00:00 disk full"));
}
