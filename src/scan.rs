//! Input directory scanning
//!
//! Plays the part of a photo picker for the command line: walks the input
//! directories, keeps supported image files and turns each one into a
//! [`PhotoDescriptor`] using a [`MetadataResolver`].

use crate::config::Config;
use crate::metadata::MetadataResolver;
use crate::photo::PhotoDescriptor;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect image files from every input directory, sorted by path
pub fn collect_image_files(config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input_dir in &config.input_dirs {
        if !input_dir.exists() {
            warn!(?input_dir, "Input directory does not exist, skipping");
            continue;
        }

        for entry in WalkDir::new(input_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_excluded_dir(&config.exclude_dirs, e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension().and_then(|e| e.to_str())
                && config.is_image(ext)
            {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "Collected image files");
    files
}

/// Build descriptors for every image under the input directories
pub fn collect_photos(config: &Config, resolver: &dyn MetadataResolver) -> Vec<PhotoDescriptor> {
    collect_image_files(config)
        .into_iter()
        .filter_map(|path| {
            let Some(source) = path.to_str() else {
                warn!(?path, "Skipping path that is not valid UTF-8");
                return None;
            };
            let metadata = resolver.resolve(source);
            Some(PhotoDescriptor::from_metadata(source, metadata))
        })
        .collect()
}

/// Whether `path` falls under an excluded directory
///
/// Absolute entries match by prefix; relative entries match any path
/// component with the same name.
fn is_excluded_dir(exclude_dirs: &[PathBuf], path: &Path) -> bool {
    exclude_dirs.iter().any(|exclude| {
        if exclude.is_absolute() {
            return path.starts_with(exclude);
        }
        let Some(exclude_name) = exclude.file_name() else {
            return false;
        };
        path.components()
            .any(|c| matches!(c, Component::Normal(name) if name == exclude_name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FsMetadataResolver;
    use chrono::Datelike;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(input: &Path) -> Config {
        Config {
            input_dirs: vec![input.to_path_buf()],
            exclude_dirs: vec![PathBuf::from(".thumbnails")],
            ..Default::default()
        }
    }

    #[test]
    fn test_collects_images_only() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::create_dir_all(dir.path().join(".thumbnails")).unwrap();
        fs::write(dir.path().join("b.JPG"), b"x").unwrap();
        fs::write(dir.path().join("sub/a.png"), b"x").unwrap();
        fs::write(dir.path().join("clip.mp4"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join(".thumbnails/t.jpg"), b"x").unwrap();

        let files = collect_image_files(&config_for(dir.path()));
        assert_eq!(
            files,
            vec![dir.path().join("b.JPG"), dir.path().join("sub/a.png")]
        );
    }

    #[test]
    fn test_missing_input_dir_is_skipped() {
        let dir = tempdir().unwrap();
        let files = collect_image_files(&config_for(&dir.path().join("nope")));
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_photos_resolves_metadata() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("IMG_20240115_143000.jpg"), b"x").unwrap();

        let photos = collect_photos(&config_for(dir.path()), &FsMetadataResolver);
        assert_eq!(photos.len(), 1);
        assert_eq!(
            photos[0].display_name.as_deref(),
            Some("IMG_20240115_143000.jpg")
        );
        assert_eq!(photos[0].captured_at.unwrap().year(), 2024);
    }

    #[test]
    fn test_is_excluded_dir() {
        let excludes = vec![PathBuf::from("@eaDir"), PathBuf::from("/data/private")];
        assert!(is_excluded_dir(&excludes, Path::new("/photos/@eaDir/x")));
        assert!(is_excluded_dir(&excludes, Path::new("/data/private/y")));
        assert!(!is_excluded_dir(&excludes, Path::new("/photos/2024")));
        assert!(!is_excluded_dir(&[], Path::new("/photos")));
    }
}
