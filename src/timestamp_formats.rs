use chrono::format::{self, Item, Parsed, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Built-in catalog, in initial rank order. Pattern letters follow the
/// `yyyy-MM-dd` convention; see [`TimestampFormat::new`].
pub const DATE_FORMATS: &[&str] = &[
    "yyyyMMdd_HHmmss",
    "MM/dd/yyyy hh:mm a",
    "yyyy-MM-dd HH:mm:ss",
    "dd/MMM/yyyy:HH:mm:ss Z",
    "yyyy-MM-dd'T'HH:mm:ss",
    "yyyy-MM-dd'T'HH:mm:ss.SSS",
    "dd-MMM-yyyy HH:mm:ss",
    "yyyy/MM/dd HH:mm:ss",
    "dd-MM-yyyy HH:mm:ss",
    "MM/dd/yyyy HH:mm:ss",
    "HH:mm:ss dd/MM/yyyy",
    "dd/MMM/yyyy",
    "yyyy/MM/dd",
    "MM-dd-yyyy",
    "dd-MM-yyyy",
    "dd.MM.yyyy",
    "MM/dd/yyyy",
    "yyyy-MM-dd",
    "yyyy-MM-dd HH:mm:ss,SSS",
    // 03-17 16:13:38
    "MM-dd HH:mm:ss",
    // 03-17 16:13:38.811
    "MM-dd HH:mm:ss.SSS",
    // Sun Dec 04 04:47:44 2005
    "EEE MMM dd HH:mm:ss yyyy",
    // Sep 05 14:20:00
    "MMM dd HH:mm:ss",
    // 10.30 16:49:06
    "MM.dd HH:mm:ss",
    // 2017-05-16_13:53:08
    "yyyy-MM-dd_HH:mm:ss",
    // 2017-05-16 00:00:00.008
    "yyyy-MM-dd HH:mm:ss.SSS",
];

/// A date/time pattern plus the number of candidates it has parsed.
#[derive(Debug, Clone)]
pub struct TimestampFormat {
    pattern: String,
    strftime: String,
    hits: u64,
}

impl TimestampFormat {
    /// Accepts a chrono strftime string (anything containing `%`) or
    /// `yyyy-MM-dd HH:mm:ss`-style pattern letters.
    pub fn new(pattern: &str) -> Result<Self> {
        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            pattern_to_strftime(pattern)?
        };
        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(Error::TimestampFormat(pattern.to_string()));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
            hits: 0,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Parses the whole candidate, counting a hit on success.
    pub fn parse(&mut self, candidate: &str, today: NaiveDate) -> Option<f64> {
        let epoch = self.try_parse(candidate, today)?;
        self.hits += 1;
        Some(epoch)
    }

    /// Epoch milliseconds (UTC). Missing year, month or day default to `today`'s;
    /// a missing time of day is midnight.
    pub fn try_parse(&self, candidate: &str, today: NaiveDate) -> Option<f64> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, candidate, StrftimeItems::new(&self.strftime)).ok()?;

        if let Ok(dt) = parsed.to_datetime() {
            return Some(dt.timestamp_millis() as f64);
        }

        if parsed.to_naive_date().is_err() {
            // setters refuse to overwrite parsed fields, which is what we want
            let _ = parsed.set_year(i64::from(today.year()));
            let _ = parsed.set_month(i64::from(today.month()));
            let _ = parsed.set_day(i64::from(today.day()));
        }
        let date = parsed.to_naive_date().ok()?;
        let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
        Some(Utc.from_utc_datetime(&date.and_time(time)).timestamp_millis() as f64)
    }
}

/// Formats ranked by hit count, most successful first.
#[derive(Debug, Clone)]
pub struct TimestampFormats {
    formats: Vec<TimestampFormat>,
}

impl Default for TimestampFormats {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TimestampFormats {
    pub fn builtin() -> Self {
        let formats = DATE_FORMATS
            .iter()
            .filter_map(|p| TimestampFormat::new(p).ok())
            .collect();
        Self { formats }
    }

    /// Stable: formats with equal hits keep their relative order.
    pub fn resort(&mut self) {
        self.formats.sort_by(|a, b| b.hits.cmp(&a.hits));
    }

    pub fn ranked(&mut self) -> std::slice::IterMut<'_, TimestampFormat> {
        self.resort();
        self.formats.iter_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimestampFormat> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Translates `yyyy-MM-dd'T'HH:mm:ss.SSS`-style letters into strftime.
pub fn pattern_to_strftime(pattern: &str) -> Result<String> {
    let invalid = || Error::TimestampFormat(pattern.to_string());
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is a literal quote, otherwise quoted text runs to the next quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(invalid()),
                    Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                        out.push('\'');
                        i += 2;
                    }
                    Some('\'') => {
                        i += 1;
                        break;
                    }
                    Some(&lit) => {
                        push_literal(&mut out, lit);
                        i += 1;
                    }
                }
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1 | 2) => "%d",
            ('H', 1 | 2) => "%H",
            ('h', 1 | 2) => "%I",
            ('m', 1 | 2) => "%M",
            ('s', 1 | 2) => "%S",
            ('S', 3) => "%3f",
            ('S', 6) => "%6f",
            ('S', 9) => "%9f",
            ('a', 1) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('Z', 1..=3) => "%z",
            ('X', 3) | ('x', 3) => "%:z",
            _ => return Err(invalid()),
        };
        out.push_str(directive);
        i += run;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
