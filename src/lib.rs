//! Age Sorter - photo organization by the subject's age
//!
//! This library copies photos into folders named after how old the subject
//! was when each photo was taken, relative to a reference birth date:
//! - Calendar-month age classification (`newborn`, `3rd_month`, `1st_year_2nd_month`, ...)
//! - Sequential batch copying with per-photo failure isolation
//! - Media index registration of copied photos
//! - Capture time lookup from EXIF metadata, file names and file system times
//! - TOML configuration and a command line front end

pub mod age;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod i18n;
pub mod media_index;
pub mod metadata;
pub mod organize;
pub mod photo;
pub mod scan;
pub mod source;

pub use age::{AgeLabel, classify, months_elapsed};
pub use cli::Cli;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use media_index::{ManifestIndex, MediaIndex, NoopIndex};
pub use metadata::{FsMetadataResolver, MetadataResolver};
pub use organize::{
    ItemFailure, ItemResult, ItemStatus, OrganizeOutcome, Organizer, OrganizerOptions,
    RegistrationWarning,
};
pub use photo::{PhotoDescriptor, PhotoMetadata};
pub use source::{ByteSource, FsByteSource};
