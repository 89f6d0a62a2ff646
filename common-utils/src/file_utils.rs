//! # File utils
//!
//! This module contains structures and functionality related to filenames and directories
//! associated with the synthetic traffic files.
//!

use std::path::{Path, PathBuf};

/// Struct providing settings for the traffic files written by the synthesiser.
pub struct TrafficFilesConfig;

impl TrafficFilesConfig {
    /// Suffix shared by every traffic file name.
    pub const FILE_SUFFIX: &'static str = "_live_web_analytics";
    /// The file extension for traffic files.
    pub const FILE_EXTENSION: &'static str = ".csv";

    /// The file name of a site's traffic file, e.g. `grammy_live_web_analytics.csv` for `grammy`.
    pub fn file_name(site_key: &str) -> String {
        [site_key, Self::FILE_SUFFIX, Self::FILE_EXTENSION]
            .iter()
            .flat_map(|s| s.chars())
            .collect()
    }
}

/// Provides the path of a site's traffic file within the given output directory.
pub fn traffic_file_path(output_directory: &Path, site_key: &str) -> PathBuf {
    let mut path = output_directory.to_path_buf();
    path.push(TrafficFilesConfig::file_name(site_key));
    path
}

/// Creates the directory along with any missing parents.
/// Does nothing if the directory already exists.
pub fn ensure_directory(path: &Path) -> std::io::Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_file_names() {
        assert_eq!(
            "grammy_live_web_analytics.csv",
            TrafficFilesConfig::file_name("grammy")
        );
        let path = traffic_file_path(Path::new("datasets"), "ra");
        assert_eq!(Path::new("datasets/ra_live_web_analytics.csv"), path.as_path());
    }

    #[test]
    fn ensure_directory_creates_parents_and_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b").join("datasets");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_directory_fails_when_a_file_is_in_the_way() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        assert!(ensure_directory(&blocker.join("datasets")).is_err());
    }
}
