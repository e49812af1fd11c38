use chrono::NaiveDate;

use logdiff::error::Error;
use logdiff::format::LogFormat;
use logdiff::line::LogLine;
use logdiff::timestamp::TimestampExtractor;
use logdiff::timestamp_formats::{pattern_to_strftime, TimestampFormat};

fn extractor() -> TimestampExtractor {
    TimestampExtractor::new().with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

fn line_with_format(raw: &str, format: &str) -> LogLine {
    let mut extractor = extractor().with_format(TimestampFormat::new(format).unwrap());
    LogLine::new(raw, 1, &LogFormat::basic(), &mut extractor, None).unwrap()
}

#[test]
fn iso_timestamp_and_remainder() {
    let line = LogLine::plain("2020-01-01 12:20:10 INFO Test", 1).unwrap();
    assert_eq!(line.timestamp().source(), "2020-01-01 12:20:10");
    assert_eq!(line.epoch(), Some(1_577_881_210_000.0));
    assert_eq!(line.non_timestamp_content(), "INFO Test");
}

#[test]
fn leading_whitespace_and_trailing_text() {
    let mut ex = extractor();
    let found = ex.extract_epoch("   Sat Jun 11 23:39:35 2005     abc").unwrap();
    assert_eq!(found.source, "Sat Jun 11 23:39:35 2005");
    assert_eq!(found.epoch, 1_118_533_175_000.0);
}

#[test]
fn android_timestamps_take_year_from_today() {
    let mut ex = extractor();
    let found = ex.extract_epoch("03-17 16:13:38.123 xyz").unwrap();
    assert_eq!(found.source, "03-17 16:13:38.123");
    assert_eq!(found.epoch, 1_710_692_018_123.0);

    let found = ex.extract_epoch("03-17 16:13:38 xyz").unwrap();
    assert_eq!(found.source, "03-17 16:13:38");
    assert_eq!(found.epoch, 1_710_692_018_000.0);
}

#[test]
fn apache_timestamps_with_and_without_brackets() {
    let line = LogLine::plain("Sat Jun 11 01:35:55 2005 xyz", 1).unwrap();
    assert_eq!(line.timestamp().source(), "Sat Jun 11 01:35:55 2005");
    assert!(line.epoch().is_some());

    let raw = "[Sat Jun 11 03:03:05 2005] [error] [client 222.166.160.74] xyz";
    let line = LogLine::plain(raw, 1).unwrap();
    assert_eq!(line.timestamp().source(), "Sat Jun 11 03:03:05 2005");
    assert_eq!(line.non_timestamp_content(), "[error] [client 222.166.160.74] xyz");
}

#[test]
fn access_log_offset_is_honoured() {
    let mut ex = extractor();
    let found = ex
        .extract_epoch("[10/Oct/2000:13:55:36 -0700] \"GET / HTTP/1.0\" 200")
        .unwrap();
    assert_eq!(found.source, "10/Oct/2000:13:55:36 -0700");
    assert_eq!(found.epoch, 971_211_336_000.0);
}

#[test]
fn rfc3339_stamps_carry_their_offset() {
    let mut ex = extractor();
    let found = ex.extract_epoch("2020-01-01T12:00:00Z worker started").unwrap();
    assert_eq!(found.source, "2020-01-01T12:00:00Z");
    assert_eq!(found.epoch, 1_577_880_000_000.0);

    let found = ex.extract_epoch("2020-01-01T12:00:00.250+01:00 worker started").unwrap();
    assert_eq!(found.epoch, 1_577_876_400_250.0);

    let line = LogLine::plain("[2020-01-01T12:00:00Z] worker started", 1).unwrap();
    assert_eq!(line.non_timestamp_content(), "worker started");
}

#[test]
fn date_only_resolves_to_midnight() {
    let mut ex = extractor();
    let found = ex.extract_epoch("03/01/2024 INFO Test").unwrap();
    assert_eq!(found.source, "03/01/2024");
    assert_eq!(found.epoch, 1_709_251_200_000.0);
}

#[test]
fn bare_number_is_a_literal_epoch() {
    let mut ex = extractor();
    let found = ex.extract_epoch("1700000000.5 worker started").unwrap();
    assert_eq!(found.epoch, 1_700_000_000.5);
    assert!(ex.extract_epoch("NaN worker started").is_none());
}

#[test]
fn lines_without_timestamps_keep_full_content() {
    let line = LogLine::plain("INFO Test", 1).unwrap();
    assert_eq!(line.epoch(), None);
    assert_eq!(line.timestamp().source(), "");
    assert_eq!(line.non_timestamp_content(), "INFO Test");
}

#[test]
fn injected_epoch_fills_in() {
    let mut ex = extractor();
    let mut ts = ex.extract("INFO Test");
    assert_eq!(ts.epoch(), None);
    ts.inject_epoch(1.0);
    assert_eq!(ts.epoch(), Some(1.0));
    assert_eq!(ts.actual_epoch(), None);
}

#[test]
fn explicit_formats_order_lines() {
    let pairs = [
        (
            line_with_format("2020,01|01 12:20:10 INFO Test", "yyyy,MM|dd HH:mm:ss"),
            line_with_format("2020,01|02 12:20:10 INFO Test", "yyyy,MM|dd HH:mm:ss"),
        ),
        (
            line_with_format("03,01?2024 INFO Test", "dd,MM?yyyy"),
            line_with_format("03,02?2024 INFO Test", "dd,MM?yyyy"),
        ),
        (
            line_with_format("2020|01|01 INFO Test", "%Y|%m|%d"),
            line_with_format("2020|01|05 INFO Test", "%Y|%m|%d"),
        ),
    ];
    for (first, second) in pairs {
        assert!(first.epoch().unwrap() < second.epoch().unwrap(), "{:?}", first.raw());
    }
}

#[test]
fn catalog_formats_order_lines() {
    let pairs = [
        ("2020-01-01 12:20:10 INFO Test", "2020-01-01 12:30:10 INFO Test"),
        ("03/01/2024 INFO Test", "03/02/2024 INFO Test"),
        ("2020-01-01T12:20:10.100 x", "2020-01-01T12:20:10.200 x"),
    ];
    for (first, second) in pairs {
        let a = LogLine::plain(first, 1).unwrap().epoch().unwrap();
        let b = LogLine::plain(second, 2).unwrap().epoch().unwrap();
        assert!(a < b, "{first} vs {second}");
    }
}

#[test]
fn rfc3339_stamps_order_lines() {
    let pairs = [
        ("2020-01-01T12:00:00Z x", "2020-01-01T12:00:01Z x"),
        ("2020-01-01T12:00:00.100Z x", "2020-01-01T12:00:00.200Z x"),
        ("2020-01-01T12:30:00+01:00 x", "2020-01-01T12:00:00Z x"),
    ];
    for (first, second) in pairs {
        let a = LogLine::plain(first, 1).unwrap().epoch().unwrap();
        let b = LogLine::plain(second, 2).unwrap().epoch().unwrap();
        assert!(a < b, "{first} vs {second}");
    }
}

#[test]
fn apache_stamps_order_lines() {
    let mut ex = extractor();
    let pairs = [
        (
            "[10/Oct/2000:13:55:36 -0700] \"GET / HTTP/1.0\" 200",
            "[10/Oct/2000:13:55:37 -0700] \"GET / HTTP/1.0\" 200",
        ),
        (
            "[10/Oct/2000:13:55:36 -0700] \"GET / HTTP/1.0\" 200",
            "[10/Oct/2000:13:55:36 -0800] \"GET / HTTP/1.0\" 200",
        ),
        (
            "[Sat Jun 11 03:03:05 2005] [error] xyz",
            "[Sat Jun 11 03:03:06 2005] [error] xyz",
        ),
        ("Sat Jun 11 23:59:59 2005 xyz", "Sun Jun 12 00:00:00 2005 xyz"),
    ];
    for (first, second) in pairs {
        let a = ex.extract_epoch(first).unwrap().epoch;
        let b = ex.extract_epoch(second).unwrap().epoch;
        assert!(a < b, "{first} vs {second}");
    }
}

#[test]
fn android_and_syslog_stamps_order_lines() {
    let mut ex = extractor();
    let pairs = [
        ("03-17 16:13:38.811 I/Zygote xyz", "03-17 16:13:39.001 I/Zygote xyz"),
        ("03-17 16:13:38 xyz", "03-18 00:00:00 xyz"),
        ("Jun 11 03:03:05 combo sshd xyz", "Jun 11 03:03:06 combo sshd xyz"),
        ("Jun 30 23:59:59 combo sshd xyz", "Jul  1 00:00:00 combo sshd xyz"),
    ];
    for (first, second) in pairs {
        let a = ex.extract_epoch(first).unwrap().epoch;
        let b = ex.extract_epoch(second).unwrap().epoch;
        assert!(a < b, "{first} vs {second}");
    }
}

#[test]
fn successful_format_moves_to_front() {
    let mut ex = extractor();
    ex.extract("03-17 16:13:38.123 first");
    ex.extract("03-17 16:13:39.456 second");

    let top = ex.formats().iter().next().unwrap();
    assert_eq!(top.pattern(), "MM-dd HH:mm:ss.SSS");
    assert_eq!(top.hits(), 2);
}

#[test]
fn java_patterns_translate_to_strftime() {
    assert_eq!(
        pattern_to_strftime("yyyy-MM-dd'T'HH:mm:ss.SSS").unwrap(),
        "%Y-%m-%dT%H:%M:%S.%3f"
    );
    assert_eq!(
        pattern_to_strftime("dd/MMM/yyyy:HH:mm:ss Z").unwrap(),
        "%d/%b/%Y:%H:%M:%S %z"
    );
    assert_eq!(pattern_to_strftime("EEE MMM dd hh:mm a").unwrap(), "%a %b %d %I:%M %p");
    assert_eq!(pattern_to_strftime("'at' HH 'o''clock' 100%").unwrap(), "at %H o'clock 100%%");
}

#[test]
fn unsupported_patterns_are_rejected() {
    assert!(matches!(pattern_to_strftime("yyyy-QQ"), Err(Error::TimestampFormat(_))));
    assert!(matches!(pattern_to_strftime("'open"), Err(Error::TimestampFormat(_))));
    assert!(matches!(TimestampFormat::new("%Q"), Err(Error::TimestampFormat(_))));
}
