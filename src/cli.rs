// Command line interface module

use clap::Parser;
use std::path::PathBuf;

/// image-sorter - browse a folder and sort pictures into bucket folders
#[derive(Parser, Debug)]
#[command(name = "image-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image file or folder to open at start-up
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Start-up path made absolute, so it matches the paths a scan produces
    pub fn start_path(&self) -> Option<PathBuf> {
        self.path
            .as_ref()
            .map(|p| std::fs::canonicalize(p).unwrap_or_else(|_| p.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_and_config() {
        let args = Args::parse_from(["image-sorter", "photos", "--config", "my.json"]);
        assert_eq!(args.path, Some(PathBuf::from("photos")));
        assert_eq!(args.config, Some(PathBuf::from("my.json")));
    }

    #[test]
    fn test_no_arguments() {
        let args = Args::parse_from(["image-sorter"]);
        assert!(args.path.is_none());
        assert!(args.start_path().is_none());
    }

    #[test]
    fn test_start_path_keeps_missing_paths() {
        let args = Args::parse_from(["image-sorter", "/definitely/not/here.png"]);
        assert_eq!(args.start_path(), Some(PathBuf::from("/definitely/not/here.png")));
    }
}
