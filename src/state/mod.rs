/// State management module
///
/// This module holds everything the window observes but does not own:
/// - Shared data structures (data.rs)
/// - Folder scanning (scanner.rs)
/// - Navigation through the loaded images (navigator.rs)
/// - Bucket bindings and the classify copy (buckets.rs)

pub mod buckets;
pub mod data;
pub mod navigator;
pub mod scanner;
