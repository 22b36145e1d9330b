//! Photo descriptors supplied by the caller

use chrono::NaiveDateTime;
use std::path::Path;

/// Immutable description of a photo to organize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDescriptor {
    /// Opaque locator handed to the byte source
    pub source: String,
    /// Destination file name; a generated name is used when absent or empty
    pub display_name: Option<String>,
    /// When the photo was taken; "now" is used when unknown
    pub captured_at: Option<NaiveDateTime>,
}

impl PhotoDescriptor {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            display_name: None,
            captured_at: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_captured_at(mut self, captured_at: NaiveDateTime) -> Self {
        self.captured_at = Some(captured_at);
        self
    }

    /// Build a descriptor from resolved metadata
    pub fn from_metadata(source: impl Into<String>, metadata: PhotoMetadata) -> Self {
        Self {
            source: source.into(),
            display_name: metadata.display_name,
            captured_at: metadata.captured_at,
        }
    }

    /// Identifier used in logs and failure reports
    pub fn identifier(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.source,
        }
    }

    /// Usable destination file name, if the display name provides one
    ///
    /// Only the final path component is kept so a name can never point
    /// outside the target directory.
    pub fn file_name(&self) -> Option<String> {
        let name = self.display_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        let last = name.rsplit(['/', '\\']).next()?;
        let file_name = Path::new(last).file_name()?.to_str()?;
        if file_name.is_empty() {
            None
        } else {
            Some(file_name.to_string())
        }
    }
}

/// Metadata looked up for a source, with every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoMetadata {
    pub display_name: Option<String>,
    pub captured_at: Option<NaiveDateTime>,
}

/// Name used when a photo has no display name
pub fn generated_file_name(epoch_millis: i64) -> String {
    format!("photo_{}.jpg", epoch_millis)
}
