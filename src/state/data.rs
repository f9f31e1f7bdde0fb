/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the scanner, the navigator and the UI layer.
use std::path::{Path, PathBuf};

/// File extensions (lowercase, without the dot) treated as images
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Check whether a path carries one of the supported image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// The ordered list of image paths for the active folder
///
/// Always sorted ascending by the full path string. A new folder
/// produces a new set; an existing set is never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    paths: Vec<PathBuf>,
}

impl ImageSet {
    /// Build a set from arbitrary paths, sorting them
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Self { paths }
    }

    /// A set holding exactly one image
    pub fn single(path: PathBuf) -> Self {
        Self { paths: vec![path] }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Index of `path` in the set, compared by equality
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.paths.iter().position(|p| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}
