//! Photo organizer
//!
//! Copies a batch of photos into age folders under a destination root:
//! `destination_root/<root_label>/<age_label>/<file_name>`.
//!
//! Photos are processed one at a time in input order. A failure on one photo
//! is recorded and the batch moves on; only broken batch preconditions (no
//! birth date, unusable destination root) stop the run before any photo is
//! touched.

use crate::age::{AgeLabel, classify};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::media_index::{MediaIndex, NoopIndex, mime_type_for};
use crate::photo::{PhotoDescriptor, generated_file_name};
use crate::source::{ByteSource, FsByteSource};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, debug, error, info, span, warn};

/// Folder created under the destination root when none is configured
pub const DEFAULT_ROOT_LABEL: &str = "Son_Photos";

const COPY_BUFFER_SIZE: usize = 256 * 1024;

/// Status of a single photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Bytes were copied to the destination
    Copied,
    /// Dry run: the destination was computed but nothing was written
    Planned,
    /// The photo could not be organized
    Failed,
}

/// Per-photo result, in input order
#[derive(Debug, Clone)]
pub struct ItemResult {
    /// Display name or locator of the photo
    pub photo: String,
    pub label: AgeLabel,
    pub destination: Option<PathBuf>,
    pub status: ItemStatus,
}

/// A photo that could not be organized
#[derive(Debug)]
pub struct ItemFailure {
    pub photo: String,
    pub error: Error,
}

/// A photo that was copied but not registered with the media index
#[derive(Debug)]
pub struct RegistrationWarning {
    pub photo: String,
    pub path: PathBuf,
    pub error: Error,
}

/// Aggregate result of one batch
#[derive(Debug, Default)]
pub struct OrganizeOutcome {
    pub total_requested: usize,
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
    pub warnings: Vec<RegistrationWarning>,
    pub results: Vec<ItemResult>,
}

impl OrganizeOutcome {
    fn new(total_requested: usize) -> Self {
        Self {
            total_requested,
            results: Vec::with_capacity(total_requested),
            ..Default::default()
        }
    }

    /// Every requested photo is accounted for exactly once
    pub fn is_consistent(&self) -> bool {
        self.succeeded + self.failures.len() == self.total_requested
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Requested: {}, Succeeded: {}, Failed: {}, Registration warnings: {}",
            self.total_requested,
            self.succeeded,
            self.failures.len(),
            self.warnings.len()
        )
    }
}

/// Where and how photos are written
#[derive(Debug, Clone)]
pub struct OrganizerOptions {
    /// Folder between the destination root and the age folders
    pub root_label: String,
    /// Compute destinations without writing anything
    pub dry_run: bool,
}

impl Default for OrganizerOptions {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            dry_run: false,
        }
    }
}

/// Drives a batch of photos into age folders
pub struct Organizer {
    options: OrganizerOptions,
    source: Box<dyn ByteSource>,
    index: Box<dyn MediaIndex>,
    clock: Box<dyn Clock>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Organizer {
    fn default() -> Self {
        Self::new(OrganizerOptions::default())
    }
}

impl Organizer {
    /// Organizer reading local files, with no media index and the system clock
    pub fn new(options: OrganizerOptions) -> Self {
        Self {
            options,
            source: Box::new(FsByteSource),
            index: Box::new(NoopIndex),
            clock: Box::new(SystemClock),
            cancel: None,
        }
    }

    pub fn with_source(mut self, source: Box<dyn ByteSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_media_index(mut self, index: Box<dyn MediaIndex>) -> Self {
        self.index = index;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Flag checked before each photo; once set the remaining photos fail
    /// with [`Error::Cancelled`]
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn options(&self) -> &OrganizerOptions {
        &self.options
    }

    /// Organize `photos` relative to `birth_date` under `destination_root`
    pub fn organize(
        &self,
        photos: &[PhotoDescriptor],
        birth_date: Option<NaiveDate>,
        destination_root: &Path,
    ) -> Result<OrganizeOutcome> {
        let _span = span!(Level::INFO, "organize", photos = photos.len()).entered();

        let birth_date = self.check_preconditions(birth_date, destination_root)?;
        info!(
            %birth_date,
            destination_root = %destination_root.display(),
            root_label = %self.options.root_label,
            dry_run = self.options.dry_run,
            "Organizing photos"
        );

        let mut outcome = OrganizeOutcome::new(photos.len());
        let mut cancelled = false;

        for photo in photos {
            cancelled = cancelled || self.is_cancelled();
            let captured_at = photo.captured_at.unwrap_or_else(|| self.clock.now());
            let label = classify(&captured_at, &birth_date);

            if cancelled {
                debug!(photo = photo.identifier(), "Skipping photo after cancellation");
                outcome.record_failure(photo, label, None, Error::Cancelled);
                continue;
            }

            let _item_span =
                span!(Level::DEBUG, "organize_photo", photo = photo.identifier()).entered();
            self.organize_one(photo, &label, destination_root, &mut outcome);
        }

        if cancelled {
            warn!("Batch cancelled before all photos were processed");
        }
        info!("{}", outcome.summary());
        debug_assert!(outcome.is_consistent());

        Ok(outcome)
    }

    fn check_preconditions(
        &self,
        birth_date: Option<NaiveDate>,
        destination_root: &Path,
    ) -> Result<NaiveDate> {
        let birth_date = birth_date
            .ok_or_else(|| Error::InvalidPrecondition("no reference birth date given".into()))?;

        if destination_root.as_os_str().is_empty() {
            return Err(Error::InvalidPrecondition(
                "destination root is empty".into(),
            ));
        }

        let root_label = self.options.root_label.trim();
        if root_label.is_empty()
            || root_label.contains(['/', '\\'])
            || root_label == "."
            || root_label == ".."
        {
            return Err(Error::InvalidPrecondition(format!(
                "invalid root label '{}'",
                self.options.root_label
            )));
        }

        // A missing root is created later; judge it by its nearest existing ancestor
        let existing = destination_root.ancestors().find_map(|path| {
            let path = if path.as_os_str().is_empty() {
                Path::new(".")
            } else {
                path
            };
            fs::metadata(path).ok().map(|metadata| (path, metadata))
        });

        if let Some((path, metadata)) = existing {
            let subject = if path == destination_root {
                format!("destination root {}", destination_root.display())
            } else {
                format!(
                    "destination root {} cannot be created: {}",
                    destination_root.display(),
                    path.display()
                )
            };
            if !metadata.is_dir() {
                return Err(Error::InvalidPrecondition(format!(
                    "{subject} is not a directory"
                )));
            }
            if metadata.permissions().readonly() && !self.options.dry_run {
                return Err(Error::InvalidPrecondition(format!("{subject} is read-only")));
            }
        }

        Ok(birth_date)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn organize_one(
        &self,
        photo: &PhotoDescriptor,
        label: &AgeLabel,
        destination_root: &Path,
        outcome: &mut OrganizeOutcome,
    ) {
        let relative_folder = format!("{}/{}", self.options.root_label.trim(), label);
        let target_dir = destination_root
            .join(self.options.root_label.trim())
            .join(label.as_str());
        let file_name = photo
            .file_name()
            .unwrap_or_else(|| generated_file_name(self.clock.epoch_millis()));
        let dest_path = target_dir.join(&file_name);

        if self.options.dry_run {
            info!(
                photo = photo.identifier(),
                destination = %dest_path.display(),
                %label,
                "Would copy photo"
            );
            outcome.record_success(photo, label.clone(), dest_path, ItemStatus::Planned);
            return;
        }

        if let Err(e) = self.copy_photo(photo, &target_dir, &dest_path) {
            error!(photo = photo.identifier(), error = %e, "Failed to organize photo");
            outcome.record_failure(photo, label.clone(), Some(dest_path), e);
            return;
        }

        info!(
            photo = photo.identifier(),
            destination = %dest_path.display(),
            %label,
            "Copied photo"
        );

        if let Err(e) = self
            .index
            .register(&dest_path, mime_type_for(&file_name), &relative_folder)
        {
            warn!(
                photo = photo.identifier(),
                path = %dest_path.display(),
                error = %e,
                "Copied photo could not be registered with the media index"
            );
            outcome.warnings.push(RegistrationWarning {
                photo: photo.identifier().to_string(),
                path: dest_path.clone(),
                error: e,
            });
        }

        outcome.record_success(photo, label.clone(), dest_path, ItemStatus::Copied);
    }

    fn copy_photo(&self, photo: &PhotoDescriptor, target_dir: &Path, dest_path: &Path) -> Result<()> {
        fs::create_dir_all(target_dir).map_err(|e| Error::DestinationWrite {
            path: target_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let reader = self.source.open_read(&photo.source)?;
        if dest_path.exists() {
            debug!(destination = %dest_path.display(), "Overwriting existing file");
        }
        copy_stream(reader, &photo.source, dest_path)?;

        if let Some(mtime) = self.source.modified(&photo.source) {
            let _ = filetime::set_file_mtime(dest_path, filetime::FileTime::from_system_time(mtime));
        }

        Ok(())
    }
}

impl OrganizeOutcome {
    fn record_success(
        &mut self,
        photo: &PhotoDescriptor,
        label: AgeLabel,
        destination: PathBuf,
        status: ItemStatus,
    ) {
        self.succeeded += 1;
        self.results.push(ItemResult {
            photo: photo.identifier().to_string(),
            label,
            destination: Some(destination),
            status,
        });
    }

    fn record_failure(
        &mut self,
        photo: &PhotoDescriptor,
        label: AgeLabel,
        destination: Option<PathBuf>,
        error: Error,
    ) {
        self.results.push(ItemResult {
            photo: photo.identifier().to_string(),
            label,
            destination,
            status: ItemStatus::Failed,
        });
        self.failures.push(ItemFailure {
            photo: photo.identifier().to_string(),
            error,
        });
    }
}

/// Stream every byte from `reader` into `dest`, replacing any existing file
///
/// Bytes land in a `.part` file beside `dest` that is renamed over it only
/// once the copy is complete, so a failed read leaves `dest` untouched.
fn copy_stream(reader: Box<dyn Read>, source_id: &str, dest: &Path) -> Result<()> {
    let temp_path = partial_path(dest);

    let result = write_partial(reader, source_id, &temp_path).and_then(|()| {
        fs::rename(&temp_path, dest).map_err(|e| Error::DestinationWrite {
            path: dest.to_path_buf(),
            message: e.to_string(),
        })
    });

    if result.is_err()
        && temp_path.exists()
        && let Err(e) = fs::remove_file(&temp_path)
    {
        warn!(path = %temp_path.display(), error = %e, "Failed to remove partial copy");
    }

    result
}

fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.part", name))
}

fn write_partial(reader: Box<dyn Read>, source_id: &str, temp_path: &Path) -> Result<()> {
    let write_error = |e: std::io::Error| Error::DestinationWrite {
        path: temp_path.to_path_buf(),
        message: e.to_string(),
    };

    let temp_file = File::create(temp_path).map_err(write_error)?;
    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, reader);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, temp_file);

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| Error::UnreadableSource {
            source_id: source_id.to_string(),
            message: e.to_string(),
        })?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read]).map_err(write_error)?;
    }

    writer.flush().map_err(write_error)?;
    Ok(())
}
