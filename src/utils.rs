//! Utility functions for kb-builder
//!
//! This module provides common utility functions used throughout the project.

use crate::error::{KbError, Result};
use std::path::Path;

/// Get file extension from path
pub fn get_file_extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file holds OCR page text
pub fn is_page_text_file<P: AsRef<Path>>(path: P) -> bool {
    matches!(get_file_extension(path).as_deref(), Some("txt"))
}

/// Format file size in human readable format
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Create the parent directory of `path` if it doesn't exist
pub fn ensure_parent_directory<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(KbError::Io)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_extension() {
        assert_eq!(get_file_extension("scan.txt"), Some("txt".to_string()));
        assert_eq!(get_file_extension("scan.TXT"), Some("txt".to_string()));
        assert_eq!(get_file_extension("scan"), None);
        assert_eq!(get_file_extension("archive.tar.gz"), Some("gz".to_string()));
    }

    #[test]
    fn test_page_text_detection() {
        assert!(is_page_text_file("sk_rektor.txt"));
        assert!(is_page_text_file("SK_REKTOR.TXT"));
        assert!(!is_page_text_file("sk_rektor.pdf"));
        assert!(!is_page_text_file("page.png"));
    }

    #[test]
    fn test_file_size_formatting() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1048576), "1.0 MB");
    }

    #[test]
    fn test_ensure_parent_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("output").join("nested").join("kb.jsonl");

        ensure_parent_directory(&target).unwrap();
        assert!(target.parent().unwrap().is_dir());

        // Bare file names have no parent to create.
        ensure_parent_directory("kb.jsonl").unwrap();
    }
}
