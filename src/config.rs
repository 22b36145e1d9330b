//! Configuration types for the age sorter

use crate::organize::{DEFAULT_ROOT_LABEL, OrganizerOptions};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration for the age sorter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input directories to scan for photos
    pub input_dirs: Vec<PathBuf>,

    /// Destination root that receives the age folders
    pub output_dir: PathBuf,

    /// Directories to exclude from scanning (absolute paths or folder names)
    pub exclude_dirs: Vec<PathBuf>,

    /// Reference birth date (YYYY-MM-DD)
    pub birth_date: Option<NaiveDate>,

    /// Folder placed between the destination root and the age folders
    pub root_label: String,

    /// Record copied photos in the media index manifest
    pub register_media: bool,

    /// Dry run mode - compute destinations without copying
    pub dry_run: bool,

    /// Verbose output
    pub verbose: bool,

    /// Supported image extensions
    pub image_extensions: Vec<String>,

    /// Supported RAW extensions
    pub raw_extensions: Vec<String>,
}

impl Default for Config {
    #[rustfmt::skip]
    fn default() -> Self {
        Self {
            input_dirs: vec![],
            output_dir: PathBuf::from("output"),
            exclude_dirs: vec![],
            birth_date: None,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            register_media: true,
            dry_run: false,
            verbose: false,
            image_extensions: vec![
                "jpg".into(), "jpeg".into(), "png".into(), "gif".into(),
                "bmp".into(), "webp".into(), "heic".into(), "heif".into(),
                "avif".into(), "tiff".into(), "tif".into(),
            ],
            raw_extensions: vec![
                "raw".into(), "arw".into(), "cr2".into(), "cr3".into(),
                "nef".into(), "orf".into(), "rw2".into(), "dng".into(),
                "raf".into(), "srw".into(), "pef".into(),
            ],
        }
    }
}

impl Config {
    /// Check if a file extension is a supported image or RAW format
    pub fn is_image(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.image_extensions.iter().any(|e| e == &ext_lower)
            || self.raw_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Options handed to the organizer
    pub fn organizer_options(&self) -> OrganizerOptions {
        OrganizerOptions {
            root_label: self.root_label.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError { source: e })?;
        write_config_text(path.as_ref(), &content)
    }

    /// Write the commented sample configuration to a file
    pub fn write_sample<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        write_config_text(path.as_ref(), &Self::sample_config())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Age Sorter Configuration File
# This file uses TOML format (https://toml.io)

# Directories to scan for photos (searched recursively)
input_dirs = [
    "/home/me/Pictures/Camera",
]

# Destination root; age folders are created below <output_dir>/<root_label>/
output_dir = "/home/me/Pictures"

# Directories to exclude from scanning
# Folder names match anywhere, absolute paths match by prefix
exclude_dirs = [
    ".thumbnails",
    "@eaDir",
]

# Reference birth date, quoted, in YYYY-MM-DD form
birth_date = "2023-03-10"

# Folder between the destination root and the age folders
# Photos land in e.g. <output_dir>/Son_Photos/1st_year_2nd_month/
root_label = "Son_Photos"

# Record copied photos in <output_dir>/.media_index.jsonl
register_media = true

# Dry run mode - show what would be done without copying anything
dry_run = false

# Verbose output - show per-photo results
verbose = false

# Supported file extensions
image_extensions = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "heic", "heif", "avif", "tiff", "tif"]
raw_extensions = ["raw", "arw", "cr2", "cr3", "nef", "orf", "rw2", "dng", "raf", "srw", "pef"]
"#
        .to_string()
    }
}

fn write_config_text(path: &Path, content: &str) -> Result<(), ConfigError> {
    let write_error = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, content).map_err(write_error)
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write config file '{}': {source}", path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {source}")]
    SerializeError { source: toml::ser::Error },
}
