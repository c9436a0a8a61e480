//! Directory scanning and extension filtering.
//!
//! A missing input folder is the one fatal condition of the whole pipeline
//! and is raised here, before any output folder exists. Everything after a
//! successful listing is best-effort.
//!
//! The surviving file list is sorted by name so the report order is stable
//! across filesystems, instead of whatever order `read_dir` happens to
//! return.

use crate::error::BatchError;
use std::path::Path;
use tracing::debug;

/// List the file names in `dir`.
///
/// Directories and other non-file entries are skipped. Entry names that are
/// not valid UTF-8 are skipped as well (they could not be matched against
/// the extension allow-list or written into the CSV report).
pub fn list_input_dir(dir: &Path) -> Result<Vec<String>, BatchError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BatchError::InputDirMissing {
                path: dir.to_path_buf(),
            }
        } else {
            BatchError::InputDirUnreadable {
                path: dir.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BatchError::InputDirUnreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let is_file = entry
            .file_type()
            .map(|t| t.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non-UTF-8 entry: {:?}", raw),
        }
    }

    Ok(names)
}

/// Keep only names whose extension is in the allow-list, sorted by name.
///
/// The extension is the suffix after the last `.`; matching is
/// case-sensitive and exact, so `photo.PNG` is excluded when the list holds
/// `png`. Names without a `.` never match.
pub fn filter_supported(names: Vec<String>, extensions: &[String]) -> Vec<String> {
    let mut supported: Vec<String> = names
        .into_iter()
        .filter(|name| {
            extension_of(name).is_some_and(|ext| extensions.iter().any(|e| e == ext))
        })
        .collect();
    supported.sort();
    supported
}

/// The suffix after the last `.` of a file name, or `None` when there is no dot.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn exts() -> Vec<String> {
        vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()]
    }

    #[test]
    fn missing_dir_is_fatal() {
        let result = list_input_dir(Path::new("/definitely/not/a/real/dir"));
        assert!(matches!(result, Err(BatchError::InputDirMissing { .. })));
    }

    #[test]
    fn lists_only_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.png"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("subdir.png")).unwrap();

        let names = list_input_dir(tmp.path()).unwrap();
        assert_eq!(names, vec!["a.png".to_string()]);
    }

    #[test]
    fn filter_keeps_allow_listed_extensions_only() {
        let names = vec![
            "a.png".to_string(),
            "b.jpg".to_string(),
            "c.txt".to_string(),
            "d.jpeg".to_string(),
        ];
        assert_eq!(filter_supported(names, &exts()), vec!["a.png", "b.jpg", "d.jpeg"]);
    }

    #[test]
    fn filter_is_case_sensitive() {
        let names = vec!["photo.PNG".to_string(), "pic.Jpg".to_string()];
        assert!(filter_supported(names, &exts()).is_empty());
    }

    #[test]
    fn filter_sorts_by_name() {
        let names = vec!["z.png".to_string(), "a.jpg".to_string(), "m.jpeg".to_string()];
        assert_eq!(filter_supported(names, &exts()), vec!["a.jpg", "m.jpeg", "z.png"]);
    }

    #[test]
    fn names_without_dot_never_match() {
        let names = vec!["README".to_string(), "png".to_string()];
        assert!(filter_supported(names, &exts()).is_empty());
    }

    #[test]
    fn extension_is_suffix_after_last_dot() {
        assert_eq!(extension_of("a.png"), Some("png"));
        assert_eq!(extension_of("archive.tar.png"), Some("png"));
        assert_eq!(extension_of(".png"), Some("png"));
        assert_eq!(extension_of("noext"), None);
    }

    #[test]
    fn unreadable_vs_missing_are_distinct() {
        // A file used as a directory path is "unreadable", not "missing".
        let tmp = tempfile::tempdir().unwrap();
        let file: PathBuf = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        let result = list_input_dir(&file);
        assert!(matches!(
            result,
            Err(BatchError::InputDirUnreadable { .. }) | Err(BatchError::InputDirMissing { .. })
        ));
    }
}
