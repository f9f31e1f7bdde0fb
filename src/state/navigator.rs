use std::path::Path;

use super::buckets::{copy_into, BucketKey, BucketMap, CollisionPolicy, CopyResult};
use super::data::ImageSet;
use crate::error::{Result, ViewerError};

/// The loaded image set and the position of the image on screen.
///
/// `current` is `None` exactly when the set is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    images: ImageSet,
    current: Option<usize>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set; the first image becomes current
    pub fn load(&mut self, images: ImageSet) {
        self.current = if images.is_empty() { None } else { Some(0) };
        self.images = images;
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.and_then(|i| self.images.get(i))
    }

    /// Step forward, wrapping from the last image to the first
    pub fn next(&mut self) -> Option<usize> {
        self.step(1)
    }

    /// Step back, wrapping from the first image to the last
    pub fn previous(&mut self) -> Option<usize> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<usize> {
        let len = self.images.len() as isize;
        let current = self.current? as isize;
        if len == 0 {
            return None;
        }

        let index = (current + delta).rem_euclid(len) as usize;
        self.current = Some(index);
        Some(index)
    }

    /// Make `path` current.
    ///
    /// A path that is not in the set (e.g. a click from a grid that was
    /// built for an older folder) fails with `NotFound` and leaves the
    /// current image as it was.
    pub fn select(&mut self, path: &Path) -> Result<usize> {
        let index = self
            .images
            .position(path)
            .ok_or_else(|| ViewerError::NotFound(path.to_path_buf()))?;
        self.current = Some(index);
        Ok(index)
    }

    /// Copy the current image into the folder bound to `key`
    pub fn classify(
        &self,
        buckets: &BucketMap,
        key: BucketKey,
        policy: CollisionPolicy,
    ) -> Result<CopyResult> {
        let Some(source) = self.current_path() else {
            return Ok(CopyResult::NoImage);
        };
        let Some(folder) = buckets.get(key) else {
            log::debug!("Bucket {} is not bound", key);
            return Ok(CopyResult::Unbound(key));
        };

        copy_into(source, folder, policy)
    }

    /// One-line description for the status bar, empty when nothing is shown
    pub fn status_line(&self) -> String {
        match (self.current, self.current_path()) {
            (Some(index), Some(path)) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default();
                format!("Image {} of {}: {}", index + 1, self.images.len(), name)
            }
            _ => String::new(),
        }
    }
}
