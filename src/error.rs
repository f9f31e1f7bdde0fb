/// Error types shared by the scanner, navigator, buckets and settings
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::buckets::BucketKey;

#[derive(Debug, Error)]
pub enum ViewerError {
    /// Missing directory or file, or a path that is not part of the loaded set
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Unreadable directory or unwritable destination
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Destination write failed part-way through a copy
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bucket key {key} is outside the {slots} configured slots")]
    BucketOutOfRange { key: BucketKey, slots: usize },

    #[error("invalid settings file {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ViewerError {
    /// Classify an I/O error raised while reading `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => ViewerError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => ViewerError::PermissionDenied(path.to_path_buf()),
            _ => ViewerError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Classify an I/O error raised while copying `from` into `to`
    pub fn from_copy(from: &Path, to: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => ViewerError::NotFound(from.to_path_buf()),
            io::ErrorKind::PermissionDenied => {
                // Unreadable source or unwritable destination
                if std::fs::File::open(from).is_err() {
                    ViewerError::PermissionDenied(from.to_path_buf())
                } else {
                    ViewerError::PermissionDenied(to.to_path_buf())
                }
            }
            _ => ViewerError::CopyFailure {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
