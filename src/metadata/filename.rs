//! Capture time embedded in file names
//!
//! Cameras, phones and messaging apps encode the capture time in the names
//! they give to photos. Patterns are tried from most to least specific.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::trace;

/// How the captures of a pattern are turned into a timestamp
#[derive(Debug, Clone, Copy)]
enum Layout {
    /// Year, month, day, hour, minute, second
    DateTime,
    /// Year, month, day; time is midnight
    DateOnly,
    /// Seconds or milliseconds since the Unix epoch
    Unix,
}

struct NamePattern {
    name: &'static str,
    regex: Regex,
    layout: Layout,
}

static PATTERNS: OnceLock<Vec<NamePattern>> = OnceLock::new();

fn patterns() -> &'static [NamePattern] {
    PATTERNS.get_or_init(|| {
        let table: [(&'static str, &'static str, Layout); 7] = [
            // 20240115_143000, 20240115-143000
            (
                "compact",
                r"(\d{4})(\d{2})(\d{2})[_\-](\d{2})(\d{2})(\d{2})",
                Layout::DateTime,
            ),
            // IMG_20240115143000, PXL_20240115_143000123
            (
                "camera",
                r"(?:IMG|DSC|DCIM|PXL|MVIMG|DJI|GOPR|GP)[-_]?(\d{4})(\d{2})(\d{2})[-_]?(\d{2})(\d{2})(\d{2})",
                Layout::DateTime,
            ),
            // Screenshot_2024-01-15-14-30-00, Screen Shot 2024-01-15 at 14.30.00
            (
                "screenshot",
                r"(?:Screenshot|Screen Shot|Capture|截图|截屏)[-_\s]*(\d{4})[-_]?(\d{2})[-_]?(\d{2})[-_\s]*(?:at[-_\s]*)?(\d{1,2})[-_\.]?(\d{2})[-_\.]?(\d{2})",
                Layout::DateTime,
            ),
            // 2024-01-15_14-30-00
            (
                "separated",
                r"(\d{4})[-_](\d{2})[-_](\d{2})[-_\s](\d{2})[-_](\d{2})[-_](\d{2})",
                Layout::DateTime,
            ),
            // IMG-20240115-WA0001
            (
                "whatsapp",
                r"IMG[-_](\d{4})(\d{2})(\d{2})[-_]WA",
                Layout::DateOnly,
            ),
            // photo_1705329000000 (our own generated names included)
            ("unix", r"(\d{13}|\d{10})", Layout::Unix),
            // 20240115
            ("date-only", r"(\d{4})(\d{2})(\d{2})", Layout::DateOnly),
        ];

        table
            .into_iter()
            .filter_map(|(name, pattern, layout)| {
                Regex::new(pattern)
                    .ok()
                    .map(|regex| NamePattern { name, regex, layout })
            })
            .collect()
    })
}

/// Parse a capture time out of a file name
pub fn parse_filename_time(filename: &str) -> Option<NaiveDateTime> {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };

    patterns().iter().find_map(|pattern| {
        let caps = pattern.regex.captures(stem)?;
        let parsed = match pattern.layout {
            Layout::DateTime => from_fields(&caps, true),
            Layout::DateOnly => from_fields(&caps, false),
            Layout::Unix => from_unix(caps.get(1)?.as_str()),
        };
        if parsed.is_some() {
            trace!(filename, pattern = pattern.name, "Matched filename pattern");
        }
        parsed
    })
}

fn from_fields(caps: &Captures<'_>, with_time: bool) -> Option<NaiveDateTime> {
    let field = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let year = i32::try_from(field(1)?).ok()?;
    if !(1990..=2100).contains(&year) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?;

    if with_time {
        date.and_hms_opt(field(4)?, field(5)?, field(6)?)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
}

fn from_unix(digits: &str) -> Option<NaiveDateTime> {
    let value: i64 = digits.parse().ok()?;
    let seconds = if digits.len() == 13 { value / 1000 } else { value };

    // 1990-01-01 ..= 2100-01-01
    if !(631_152_000..=4_102_444_800).contains(&seconds) {
        return None;
    }

    DateTime::from_timestamp(seconds, 0).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_compact_format() {
        let dt = parse_filename_time("20240115_143000.jpg").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 15));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 30, 0));

        let dt = parse_filename_time("20240115-143000.jpg").unwrap();
        assert_eq!(dt.year(), 2024);
    }

    #[test]
    fn test_camera_prefixes() {
        let dt = parse_filename_time("IMG_20240115_143000.jpg").unwrap();
        assert_eq!(dt.month(), 1);

        let dt = parse_filename_time("PXL_20230704_091502123.jpg").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 7, 4));
        assert_eq!(dt.hour(), 9);
    }

    #[test]
    fn test_whatsapp_format() {
        let dt = parse_filename_time("IMG-20240115-WA0001.jpg").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 15));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_separated_and_screenshot() {
        let dt = parse_filename_time("2024-01-15_14-30-00.png").unwrap();
        assert_eq!(dt.minute(), 30);

        let dt = parse_filename_time("Screenshot_2023-12-31-23-59-58.png").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 12, 31));
    }

    #[test]
    fn test_unix_timestamps() {
        // 2024-01-15 14:30:00 UTC
        let dt = parse_filename_time("photo_1705329000.jpg").unwrap();
        assert_eq!(dt.hour(), 14);

        let dt = parse_filename_time("photo_1705329000123.jpg").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 15));
    }

    #[test]
    fn test_unrecognized_names() {
        assert!(parse_filename_time("beach.jpg").is_none());
        assert!(parse_filename_time("random_file.jpg").is_none());
        assert!(parse_filename_time("19800101_000000.jpg").is_none());
        assert!(parse_filename_time("20241345_000000.jpg").is_none());
    }
}
