//! Byte stream resolution for photo sources

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

/// Resolves an opaque photo locator into a readable stream
pub trait ByteSource {
    fn open_read(&self, source: &str) -> Result<Box<dyn Read>>;

    /// Modification time of the source, when the backend knows one
    fn modified(&self, _source: &str) -> Option<SystemTime> {
        None
    }
}

/// Treats locators as local file system paths
#[derive(Debug, Default, Clone, Copy)]
pub struct FsByteSource;

impl ByteSource for FsByteSource {
    fn open_read(&self, source: &str) -> Result<Box<dyn Read>> {
        let path = Path::new(source);
        if path.is_dir() {
            return Err(Error::UnreadableSource {
                source_id: source.to_string(),
                message: "source is a directory".to_string(),
            });
        }
        let file = File::open(path).map_err(|e| Error::UnreadableSource {
            source_id: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Box::new(file))
    }

    fn modified(&self, source: &str) -> Option<SystemTime> {
        fs::metadata(source).and_then(|m| m.modified()).ok()
    }
}
