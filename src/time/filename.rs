//! Filename timestamp parsing

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    /// Pattern: IMG_YYYYMMDD_HHmmss (common camera naming), time optional
    static ref PATTERN_PREFIXED: Regex = Regex::new(
        r"(?:IMG|VID|DSC)[-_](\d{4})(\d{2})(\d{2})(?:[-_](\d{2})(\d{2})(\d{2}))?"
    ).unwrap();

    /// Pattern: YYYY-MM-DD with -, _, . or space separators, time optional
    static ref PATTERN_SEPARATED: Regex = Regex::new(
        r"(\d{4})[-_. ](\d{2})[-_. ](\d{2})(?:[-_. ](\d{2})[-_.:](\d{2})[-_.:](\d{2}))?"
    ).unwrap();

    /// Pattern: bare YYYYMMDD, time optional
    static ref PATTERN_COMPACT: Regex = Regex::new(
        r"(\d{4})(\d{2})(\d{2})(?:[-_](\d{2})(\d{2})(\d{2}))?"
    ).unwrap();

    /// Pattern: Screenshot YYYY-MM-DD at HH.mm.ss
    static ref PATTERN_SCREENSHOT: Regex = Regex::new(
        r"Screenshot[-_ ](\d{4})-(\d{2})-(\d{2})[-_ ]at[-_ ](\d{1,2})[-_.](\d{2})[-_.](\d{2})"
    ).unwrap();
}

/// Parse a timestamp out of a filename
///
/// Patterns are tried in a fixed order; the first one that matches and
/// yields a calendar-valid date wins. Returns `None` when nothing matches.
pub fn parse_filename_time(filename: &str) -> Option<NaiveDateTime> {
    if let Some(dt) = try_pattern(&PATTERN_PREFIXED, filename) {
        trace!(filename, "Matched prefixed pattern");
        return Some(dt);
    }

    // Screenshot names also carry a Y-M-D run; matching them first keeps
    // the time-of-day component they encode after "at"
    if let Some(dt) = try_pattern(&PATTERN_SCREENSHOT, filename) {
        trace!(filename, "Matched screenshot pattern");
        return Some(dt);
    }

    if let Some(dt) = try_pattern(&PATTERN_SEPARATED, filename) {
        trace!(filename, "Matched separated pattern");
        return Some(dt);
    }

    if let Some(dt) = try_pattern(&PATTERN_COMPACT, filename) {
        trace!(filename, "Matched compact pattern");
        return Some(dt);
    }

    None
}

fn try_pattern(pattern: &Regex, s: &str) -> Option<NaiveDateTime> {
    let caps = pattern.captures(s)?;
    build_datetime(
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
        caps.get(4).map(|m| m.as_str()).unwrap_or("00"),
        caps.get(5).map(|m| m.as_str()).unwrap_or("00"),
        caps.get(6).map(|m| m.as_str()).unwrap_or("00"),
    )
}

fn build_datetime(
    year: &str,
    month: &str,
    day: &str,
    hour: &str,
    minute: &str,
    second: &str,
) -> Option<NaiveDateTime> {
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    let second: u32 = second.parse().ok()?;

    // Reject digit runs that cannot be dates (month 13, random numbers)
    if !(1900..=2100).contains(&year) {
        return None;
    }
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    chrono::NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
