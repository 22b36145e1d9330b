//! EXIF capture time

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// Date tags in priority order
const DATE_TAGS: &[Tag] = &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Read the capture time recorded by the camera
pub fn extract_exif_time(path: &Path) -> Result<NaiveDateTime> {
    let exif_error = |message: String| Error::ExifRead {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = BufReader::new(File::open(path)?);
    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| exif_error(e.to_string()))?;

    DATE_TAGS
        .iter()
        .find_map(|tag| {
            let field = exif.get_field(*tag, In::PRIMARY)?;
            let parsed = parse_exif_datetime(&field.display_value().to_string());
            if parsed.is_some() {
                trace!(?path, ?tag, "Found EXIF date");
            }
            parsed
        })
        .ok_or_else(|| exif_error("no usable date tag".to_string()))
}

/// Parse `YYYY:MM:DD HH:MM:SS` and the variants some writers emit
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    [
        "%Y:%m:%d %H:%M:%S",
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ]
    .into_iter()
    .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_exif_datetime() {
        let dt = parse_exif_datetime("2024:01:15 14:30:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 15));
        assert_eq!((dt.hour(), dt.minute()), (14, 30));

        assert!(parse_exif_datetime("\"2024:01:15 14:30:00\"").is_some());
        assert!(parse_exif_datetime("2024-01-15T14:30:00").is_some());
        assert!(parse_exif_datetime("2024:01:15 14:30:00.25").is_some());
        assert!(parse_exif_datetime("invalid").is_none());
    }

    #[test]
    fn test_file_without_exif() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not an image").unwrap();
        file.flush().unwrap();

        let err = extract_exif_time(file.path()).unwrap_err();
        assert!(matches!(err, Error::ExifRead { .. }));
    }
}
