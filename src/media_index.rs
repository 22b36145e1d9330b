//! Media index registration
//!
//! After a photo is copied it is announced to a media index so other gallery
//! readers can find it. The default index is a JSON Lines manifest kept at the
//! destination root; one record is appended per registered file.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Manifest file name used by [`ManifestIndex`]
pub const MANIFEST_FILE_NAME: &str = ".media_index.jsonl";

/// MIME type assumed when the extension is unknown
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Index that makes copied photos discoverable
pub trait MediaIndex {
    fn register(&self, path: &Path, mime_type: &str, relative_folder: &str) -> Result<()>;
}

/// Index that records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndex;

impl MediaIndex for NoopIndex {
    fn register(&self, _path: &Path, _mime_type: &str, _relative_folder: &str) -> Result<()> {
        Ok(())
    }
}

/// One registered file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub display_name: String,
    pub path: PathBuf,
    pub mime_type: String,
    pub relative_path: String,
    pub registered_at: DateTime<Utc>,
}

/// Append-only JSON Lines manifest
#[derive(Debug, Clone)]
pub struct ManifestIndex {
    manifest_path: PathBuf,
}

impl ManifestIndex {
    /// Manifest stored at the root of an organized tree
    pub fn in_root(destination_root: &Path) -> Self {
        Self::new(destination_root.join(MANIFEST_FILE_NAME))
    }

    pub fn new(manifest_path: PathBuf) -> Self {
        Self { manifest_path }
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Read every record in the manifest
    pub fn records(&self) -> Result<Vec<MediaRecord>> {
        if !self.manifest_path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.manifest_path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl MediaIndex for ManifestIndex {
    fn register(&self, path: &Path, mime_type: &str, relative_folder: &str) -> Result<()> {
        let registration_error = |message: String| Error::Registration {
            path: path.to_path_buf(),
            message,
        };

        let record = MediaRecord {
            display_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            mime_type: mime_type.to_string(),
            relative_path: relative_folder.to_string(),
            registered_at: Utc::now(),
        };

        if let Some(parent) = self.manifest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| registration_error(e.to_string()))?;
        }

        let mut line =
            serde_json::to_string(&record).map_err(|e| registration_error(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.manifest_path)
            .map_err(|e| registration_error(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| registration_error(e.to_string()))?;

        trace!(?path, mime_type, relative_folder, "Registered media file");
        Ok(())
    }
}

/// MIME type for an image file name, by extension
pub fn mime_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "dng" => "image/x-adobe-dng",
        "cr2" => "image/x-canon-cr2",
        "cr3" => "image/x-canon-cr3",
        "nef" => "image/x-nikon-nef",
        "arw" => "image/x-sony-arw",
        "orf" => "image/x-olympus-orf",
        "rw2" => "image/x-panasonic-rw2",
        "raf" => "image/x-fuji-raf",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for("a.JPG"), "image/jpeg");
        assert_eq!(mime_type_for("a.png"), "image/png");
        assert_eq!(mime_type_for("a.HEIC"), "image/heic");
        assert_eq!(mime_type_for("noext"), "image/jpeg");
        assert_eq!(mime_type_for("a.xyz"), "image/jpeg");
    }

    #[test]
    fn test_manifest_appends_records() {
        let dir = tempdir().unwrap();
        let index = ManifestIndex::in_root(dir.path());
        assert!(index.records().unwrap().is_empty());

        let first = dir.path().join("Son_Photos/newborn/a.jpg");
        let second = dir.path().join("Son_Photos/1st_month/b.png");
        index
            .register(&first, "image/jpeg", "Son_Photos/newborn")
            .unwrap();
        index
            .register(&second, "image/png", "Son_Photos/1st_month")
            .unwrap();

        let records = index.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name, "a.jpg");
        assert_eq!(records[0].relative_path, "Son_Photos/newborn");
        assert_eq!(records[1].mime_type, "image/png");
        assert_eq!(records[1].path, second);
    }

    #[test]
    fn test_manifest_in_unwritable_location_fails() {
        let dir = tempdir().unwrap();
        // A file standing where the manifest's parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let index = ManifestIndex::new(blocker.join(MANIFEST_FILE_NAME));

        let err = index
            .register(&dir.path().join("a.jpg"), "image/jpeg", "Son_Photos/newborn")
            .unwrap_err();
        assert!(matches!(err, Error::Registration { .. }));
    }
}
