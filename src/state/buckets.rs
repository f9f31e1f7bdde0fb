/// Bucket folders bound to digit keys, and the copy that fills them
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};

/// Largest number of buckets: one per digit key
pub const MAX_SLOTS: usize = 10;

/// A digit key (`0`..=`9`) that can carry a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey(u8);

impl BucketKey {
    /// Keys in keyboard order: `1`..`9` then `0`
    pub const ALL: [BucketKey; MAX_SLOTS] = [
        BucketKey(1),
        BucketKey(2),
        BucketKey(3),
        BucketKey(4),
        BucketKey(5),
        BucketKey(6),
        BucketKey(7),
        BucketKey(8),
        BucketKey(9),
        BucketKey(0),
    ];

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| BucketKey(d as u8))
    }

    /// Position of this key in keyboard order
    fn slot(self) -> usize {
        if self.0 == 0 {
            MAX_SLOTS - 1
        } else {
            self.0 as usize - 1
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to do when the bucket already holds a file with the same name
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Leave the existing file alone
    Skip,
    /// Copy under a free name: `name (1).ext`, `name (2).ext`, ...
    Rename,
}

/// Outcome of a classify request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyResult {
    Copied { destination: PathBuf },
    Skipped { destination: PathBuf },
    Unbound(BucketKey),
    NoImage,
}

/// Session-only mapping from digit keys to destination folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketMap {
    slots: usize,
    bindings: BTreeMap<BucketKey, PathBuf>,
}

impl BucketMap {
    /// Create an empty map with `slots` active keys (clamped to 1..=10)
    pub fn new(slots: usize) -> Self {
        Self {
            slots: slots.clamp(1, MAX_SLOTS),
            bindings: BTreeMap::new(),
        }
    }

    /// Number of active keys
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Active keys in keyboard order
    pub fn keys(&self) -> impl Iterator<Item = BucketKey> + '_ {
        BucketKey::ALL.into_iter().take(self.slots)
    }

    pub fn is_active(&self, key: BucketKey) -> bool {
        key.slot() < self.slots
    }

    /// Bind `key` to `folder`, replacing any previous binding
    pub fn bind(&mut self, key: BucketKey, folder: PathBuf) -> Result<()> {
        if !self.is_active(key) {
            return Err(ViewerError::BucketOutOfRange {
                key,
                slots: self.slots,
            });
        }

        log::info!("Bucket {} -> {}", key, folder.display());
        self.bindings.insert(key, folder);
        Ok(())
    }

    pub fn unbind(&mut self, key: BucketKey) -> Option<PathBuf> {
        self.bindings.remove(&key)
    }

    /// Folder bound to `key`, if the key is active and bound
    pub fn get(&self, key: BucketKey) -> Option<&Path> {
        if !self.is_active(key) {
            return None;
        }
        self.bindings.get(&key).map(PathBuf::as_path)
    }
}

/// Copy `source` into `folder` under its own file name.
///
/// `Skip` reports `Skipped` when the name is taken; `Rename` picks the first
/// free `name (n).ext`. The copy itself is a plain `fs::copy`.
///
/// A destination that is the source file itself (same folder, symlink, or
/// another spelling of the path) is always `Skipped`.
pub fn copy_into(source: &Path, folder: &Path, policy: CollisionPolicy) -> Result<CopyResult> {
    if !folder.is_dir() {
        return Err(ViewerError::NotFound(folder.to_path_buf()));
    }

    let file_name = source
        .file_name()
        .ok_or_else(|| ViewerError::NotFound(source.to_path_buf()))?;
    let mut destination = folder.join(file_name);

    if destination.exists() {
        if is_same_file(source, &destination) {
            log::info!("Skipped {}: bucket is the image's own folder", destination.display());
            return Ok(CopyResult::Skipped { destination });
        }

        match policy {
            CollisionPolicy::Overwrite => {}
            CollisionPolicy::Skip => {
                log::info!("Skipped {}: already in bucket", destination.display());
                return Ok(CopyResult::Skipped { destination });
            }
            CollisionPolicy::Rename => destination = free_name(folder, source),
        }
    }

    fs::copy(source, &destination).map_err(|e| ViewerError::from_copy(source, &destination, e))?;
    log::info!("Copied {} -> {}", source.display(), destination.display());

    Ok(CopyResult::Copied { destination })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// First `stem (n).ext` in `folder` that does not exist yet
fn free_name(folder: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| folder.join(format!("{stem} ({n}){extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| folder.join(source.file_name().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_keys_follow_keyboard_order() {
        let map = BucketMap::new(3);
        let keys: Vec<_> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["1", "2", "3"]);

        let map = BucketMap::new(10);
        let last = map.keys().last().unwrap();
        assert_eq!(last, BucketKey::from_char('0').unwrap());
    }

    #[test]
    fn test_slot_count_is_clamped() {
        assert_eq!(BucketMap::new(0).slots(), 1);
        assert_eq!(BucketMap::new(42).slots(), MAX_SLOTS);
    }

    #[test]
    fn test_from_char() {
        assert_eq!(BucketKey::from_char('7'), Some(BucketKey(7)));
        assert_eq!(BucketKey::from_char('0'), Some(BucketKey(0)));
        assert_eq!(BucketKey::from_char('x'), None);
    }

    #[test]
    fn test_bind_outside_active_slots() {
        let mut map = BucketMap::new(2);
        let three = BucketKey::from_char('3').unwrap();

        let err = map.bind(three, PathBuf::from("/dest")).unwrap_err();
        assert!(matches!(err, ViewerError::BucketOutOfRange { slots: 2, .. }));
        assert_eq!(map.get(three), None);
    }

    #[test]
    fn test_bind_replace_and_unbind() {
        let mut map = BucketMap::new(3);
        let one = BucketKey::from_char('1').unwrap();

        map.bind(one, PathBuf::from("/first")).unwrap();
        map.bind(one, PathBuf::from("/second")).unwrap();
        assert_eq!(map.get(one), Some(Path::new("/second")));

        assert_eq!(map.unbind(one), Some(PathBuf::from("/second")));
        assert_eq!(map.get(one), None);
    }

    #[test]
    fn test_copy_overwrite() {
        let src_dir = TempDir::new().unwrap();
        let dest_dir = TempDir::new().unwrap();
        let source = src_dir.path().join("b.jpg");
        write(&source, "new");
        write(&dest_dir.path().join("b.jpg"), "old");

        let result = copy_into(&source, dest_dir.path(), CollisionPolicy::Overwrite).unwrap();

        let destination = dest_dir.path().join("b.jpg");
        assert_eq!(result, CopyResult::Copied { destination: destination.clone() });
        assert_eq!(fs::read_to_string(destination).unwrap(), "new");
    }

    #[test]
    fn test_copy_skip_keeps_existing() {
        let src_dir = TempDir::new().unwrap();
        let dest_dir = TempDir::new().unwrap();
        let source = src_dir.path().join("b.jpg");
        write(&source, "new");
        write(&dest_dir.path().join("b.jpg"), "old");

        let result = copy_into(&source, dest_dir.path(), CollisionPolicy::Skip).unwrap();

        assert!(matches!(result, CopyResult::Skipped { .. }));
        assert_eq!(fs::read_to_string(dest_dir.path().join("b.jpg")).unwrap(), "old");
    }

    #[test]
    fn test_copy_rename_finds_free_name() {
        let src_dir = TempDir::new().unwrap();
        let dest_dir = TempDir::new().unwrap();
        let source = src_dir.path().join("b.jpg");
        write(&source, "new");
        write(&dest_dir.path().join("b.jpg"), "old");
        write(&dest_dir.path().join("b (1).jpg"), "older");

        let result = copy_into(&source, dest_dir.path(), CollisionPolicy::Rename).unwrap();

        let expected = dest_dir.path().join("b (2).jpg");
        assert_eq!(result, CopyResult::Copied { destination: expected.clone() });
        assert_eq!(fs::read_to_string(expected).unwrap(), "new");
        assert_eq!(fs::read_to_string(dest_dir.path().join("b.jpg")).unwrap(), "old");
    }

    #[test]
    fn test_copy_into_own_folder_keeps_image() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.png");
        write(&source, "precious pixels");

        for policy in [
            CollisionPolicy::Overwrite,
            CollisionPolicy::Skip,
            CollisionPolicy::Rename,
        ] {
            let result = copy_into(&source, dir.path(), policy).unwrap();

            assert_eq!(result, CopyResult::Skipped { destination: source.clone() });
            assert_eq!(fs::read_to_string(&source).unwrap(), "precious pixels");
            assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        }
    }

    #[test]
    fn test_copy_into_other_spelling_of_own_folder() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let source = dir.path().join("a.png");
        write(&source, "precious pixels");

        let folder = nested.join("..");
        let result = copy_into(&source, &folder, CollisionPolicy::Overwrite).unwrap();

        assert!(matches!(result, CopyResult::Skipped { .. }));
        assert_eq!(fs::read_to_string(&source).unwrap(), "precious pixels");
    }

    #[test]
    fn test_copy_into_missing_folder() {
        let src_dir = TempDir::new().unwrap();
        let source = src_dir.path().join("b.jpg");
        write(&source, "data");

        let missing = src_dir.path().join("no-such-bucket");
        let err = copy_into(&source, &missing, CollisionPolicy::Overwrite).unwrap_err();
        assert!(matches!(err, ViewerError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_copy_missing_source() {
        let src_dir = TempDir::new().unwrap();
        let dest_dir = TempDir::new().unwrap();

        let err = copy_into(
            &src_dir.path().join("vanished.png"),
            dest_dir.path(),
            CollisionPolicy::Overwrite,
        )
        .unwrap_err();
        assert!(matches!(err, ViewerError::NotFound(_)));
        assert_eq!(fs::read_dir(dest_dir.path()).unwrap().count(), 0);
    }
}
