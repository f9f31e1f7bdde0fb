/// Thumbnail generation for the image grid
///
/// Thumbnails are decoded with the `image` crate and kept in memory as
/// RGBA pixels; nothing is cached on disk.
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{Result, ViewerError};

/// Default edge length of generated thumbnails (square bound)
pub const THUMBNAIL_SIZE: u32 = 64;

/// A decoded, downsized image ready to hand to the UI
#[derive(Clone)]
pub struct Thumbnail {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Raw RGBA pixel data (4 bytes per pixel)
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Generate a thumbnail off the UI thread
///
/// Errors are flattened to strings so the result can travel in a message.
pub async fn load_thumbnail(path: PathBuf, size: u32) -> std::result::Result<Thumbnail, String> {
    // Spawn blocking because decoding is CPU-intensive
    task::spawn_blocking(move || generate_thumbnail(&path, size).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Decode `path` and shrink it to fit a `size` x `size` box, keeping aspect ratio
pub fn generate_thumbnail(path: &Path, size: u32) -> Result<Thumbnail> {
    let img = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(err) => ViewerError::from_io(path, err),
        source => ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    // Never upscale small images
    let thumbnail = if img.width() > size || img.height() > size {
        img.resize(size, size, FilterType::Triangle)
    } else {
        img
    };

    let rgba = thumbnail.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Thumbnail {
        path: path.to_path_buf(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
