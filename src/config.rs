/// User settings, read once at start-up
///
/// The file lives in the user's config directory:
/// - Linux: ~/.config/image-sorter/settings.json
/// - macOS: ~/Library/Application Support/image-sorter/settings.json
/// - Windows: %APPDATA%\image-sorter\settings.json
///
/// Settings are never written back; bucket bindings stay session-only.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};
use crate::state::buckets::{CollisionPolicy, MAX_SLOTS};
use crate::thumbnail::THUMBNAIL_SIZE;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Number of digit keys that can carry a bucket (1..=10)
    pub bucket_slots: usize,
    /// What a classify does when the bucket already has the file
    pub collision_policy: CollisionPolicy,
    /// Edge length of grid thumbnails in pixels
    pub thumbnail_size: u32,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bucket_slots: 3,
            collision_policy: CollisionPolicy::Overwrite,
            thumbnail_size: THUMBNAIL_SIZE,
            window_width: 800.0,
            window_height: 600.0,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("image-sorter");
        path.push("settings.json");
        Some(path)
    }

    /// Load settings from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(ViewerError::from_io(path, e)),
        };

        Self::from_json(&content)
            .map_err(|source| ViewerError::Settings {
                path: path.to_path_buf(),
                source,
            })
            .map(|settings| {
                log::info!("Loaded settings from {}", path.display());
                settings
            })
    }

    /// Parse settings and bring every field into its valid range
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::clamped)
    }

    fn clamped(mut self) -> Self {
        self.bucket_slots = self.bucket_slots.clamp(1, MAX_SLOTS);
        self.thumbnail_size = self.thumbnail_size.clamp(16, 512);
        self.window_width = self.window_width.max(320.0);
        self.window_height = self.window_height.max(240.0);
        self
    }
}
