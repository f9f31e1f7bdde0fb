use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::data::{is_supported_image, ImageSet};
use crate::error::{Result, ViewerError};

/// Scan a folder for images.
///
/// Only the immediate entries of `directory` are listed. Regular files
/// (symlinks are followed) with a supported extension are kept and sorted
/// by their full path.
///
/// Fails with `NotFound` if the directory does not exist or is not a
/// directory, and `PermissionDenied` if it cannot be read.
pub fn scan(directory: &Path) -> Result<ImageSet> {
    let metadata = fs::metadata(directory).map_err(|e| ViewerError::from_io(directory, e))?;
    if !metadata.is_dir() {
        return Err(ViewerError::NotFound(directory.to_path_buf()));
    }

    let mut paths = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The folder itself could not be listed
            Err(err) if err.depth() == 0 => {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory loop"));
                return Err(ViewerError::from_io(directory, source));
            }
            Err(err) => {
                log::warn!("Skipping unreadable entry in {}: {}", directory.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        // WalkDir joins the entry name onto `directory`
        let path = entry.into_path();
        if is_supported_image(&path) {
            paths.push(path);
        }
    }

    let images = ImageSet::from_paths(paths);
    log::info!("Scanned {}: {} images", directory.display(), images.len());

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["c.gif", "a.png", "b.JPG", "notes.txt", "d.jpeg", "e.bmp", "noext"] {
            touch(temp_dir.path(), name);
        }

        let images = scan(temp_dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.png", "b.JPG", "c.gif", "d.jpeg", "e.bmp"]);

        // Every path is rooted in the scanned folder
        assert!(images.iter().all(|p| p.parent() == Some(temp_dir.path())));

        // Ascending by full path string
        let paths: Vec<_> = images.iter().collect();
        for pair in paths.windows(2) {
            assert!(pair[0].as_os_str() <= pair[1].as_os_str());
        }
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "top.png");

        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "deep.png");

        // A directory named like an image is not an image
        fs::create_dir(temp_dir.path().join("folder.png")).unwrap();

        let images = scan(temp_dir.path()).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images.get(0), Some(temp_dir.path().join("top.png").as_path()));
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let images = scan(temp_dir.path()).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let err = scan(&missing).unwrap_err();
        assert!(matches!(err, ViewerError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_scan_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.png");

        let err = scan(&temp_dir.path().join("a.png")).unwrap_err();
        assert!(matches!(err, ViewerError::NotFound(_)));
    }
}
