//! Photo metadata resolution
//!
//! Looks up the display name and capture time of a photo source. The capture
//! time is taken from the first source that yields one:
//! 1. EXIF metadata
//! 2. A timestamp embedded in the file name
//! 3. File system modification time
//!
//! Every field stays optional; the organizer decides the fallbacks.

pub mod exif;
pub mod filename;

use crate::photo::PhotoMetadata;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Where a capture time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    Exif,
    Filename,
    FileSystem,
}

/// Looks up metadata for a photo locator
pub trait MetadataResolver {
    fn resolve(&self, source: &str) -> PhotoMetadata;
}

/// Resolves metadata for local files
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMetadataResolver;

impl MetadataResolver for FsMetadataResolver {
    fn resolve(&self, source: &str) -> PhotoMetadata {
        let path = Path::new(source);
        PhotoMetadata {
            display_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string),
            captured_at: capture_time(path).map(|(timestamp, _)| timestamp),
        }
    }
}

/// Capture time of a local file and its origin
pub fn capture_time(path: &Path) -> Option<(NaiveDateTime, TimeSource)> {
    match exif::extract_exif_time(path) {
        Ok(time) => {
            debug!(?path, "Capture time from EXIF");
            return Some((time, TimeSource::Exif));
        }
        Err(e) => debug!(?path, error = %e, "No EXIF capture time"),
    }

    if let Some(time) = path
        .file_name()
        .and_then(|f| f.to_str())
        .and_then(filename::parse_filename_time)
    {
        debug!(?path, "Capture time from filename");
        return Some((time, TimeSource::Filename));
    }

    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => {
            warn!(?path, "Using file system modification time as capture time");
            let local: DateTime<Local> = modified.into();
            Some((local.naive_local(), TimeSource::FileSystem))
        }
        Err(e) => {
            warn!(?path, error = %e, "Capture time unknown");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_from_filename() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("IMG_20230704_091502.jpg");
        fs::write(&path, b"no exif here").unwrap();

        let metadata = FsMetadataResolver.resolve(path.to_str().unwrap());
        assert_eq!(metadata.display_name.as_deref(), Some("IMG_20230704_091502.jpg"));
        let captured = metadata.captured_at.unwrap();
        assert_eq!((captured.year(), captured.month(), captured.day()), (2023, 7, 4));

        let (_, source) = capture_time(&path).unwrap();
        assert_eq!(source, TimeSource::Filename);
    }

    #[test]
    fn test_resolve_falls_back_to_mtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("beach.jpg");
        fs::write(&path, b"no exif here").unwrap();

        let (_, source) = capture_time(&path).unwrap();
        assert_eq!(source, TimeSource::FileSystem);
        assert!(FsMetadataResolver.resolve(path.to_str().unwrap()).captured_at.is_some());
    }

    #[test]
    fn test_resolve_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.jpg");

        let metadata = FsMetadataResolver.resolve(path.to_str().unwrap());
        assert_eq!(metadata.display_name.as_deref(), Some("gone.jpg"));
        assert!(metadata.captured_at.is_none());
    }
}
