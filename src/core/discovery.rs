// LogTally - core/discovery.rs
//
// Log file discovery in a single directory (non-recursive).
//
// Architecture note: this module uses `walkdir` for directory listing as an
// OS abstraction. It reads only file *metadata*, never file *contents* --
// that boundary is owned by the app layer (app::scan).
//
// Per-entry I/O errors are non-fatal. Inaccessible entries whose names match
// the include patterns are returned as file failures; anything else is a
// warning. Only an invalid root is an `Err`.

use crate::core::model::{DiscoveredFile, FileFailure};
use crate::util::constants;
use crate::util::error::DiscoveryError;
use std::path::Path;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Filename globs a file must match to be read. Empty = every file.
    pub include_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Result of listing the log directory.
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    /// Readable log files, sorted by file name.
    pub files: Vec<DiscoveredFile>,

    /// Entries matching the include patterns that could not be accessed
    /// (dangling symlinks, unreadable metadata).
    pub failures: Vec<FileFailure>,

    /// Non-fatal notes about entries that are not log files.
    pub warnings: Vec<String>,
}

/// List the log files directly inside `root`, sorted by file name.
///
/// Subdirectories are not descended into and non-matching names are ignored.
/// The lexicographic order makes report line order reproducible across runs.
///
/// # Fatal errors
/// Returns `Err` only if `root` does not exist, is not a directory, or cannot
/// be listed at all.
pub fn discover_files(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<DiscoveryOutcome, DiscoveryError> {
    // fs::metadata rather than Path::is_dir so PermissionDenied is not
    // reported as "does not exist".
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            })
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    tracing::debug!(
        root = %root.display(),
        include = ?config.include_patterns,
        "Discovery starting"
    );

    let include_pats = compile_patterns(&config.include_patterns);
    let mut outcome = DiscoveryOutcome::default();

    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            // An error at depth 0 means the directory itself cannot be read.
            Err(e) if e.depth() == 0 => {
                return Err(DiscoveryError::Traversal {
                    path: root.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                let Some(path) = e.path().map(Path::to_path_buf) else {
                    let msg = format!("Cannot access directory entry: {e}");
                    tracing::debug!(warning = %msg, "Discovery warning");
                    outcome.warnings.push(msg);
                    continue;
                };
                let included = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| is_included(n, &include_pats));
                if included {
                    tracing::debug!(file = %path.display(), error = %e, "Log file not accessible");
                    outcome.failures.push(FileFailure {
                        path,
                        reason: e.to_string(),
                    });
                } else {
                    let msg = format!("Cannot access '{}': {e}", path.display());
                    tracing::debug!(warning = %msg, "Discovery warning");
                    outcome.warnings.push(msg);
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                outcome
                    .warnings
                    .push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        outcome.files.push(DiscoveredFile {
            path: path.to_path_buf(),
            compressed: is_gzip(path),
        });
    }

    tracing::debug!(
        files = outcome.files.len(),
        failures = outcome.failures.len(),
        warnings = outcome.warnings.len(),
        "Discovery complete"
    );

    Ok(outcome)
}

/// True when the path's final extension marks a gzip stream.
pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(constants::GZIP_EXTENSION))
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile glob pattern strings; patterns that fail to compile are logged and skipped.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `file_name` matches at least one include pattern.
/// An empty include list means "include all".
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    if include_pats.is_empty() {
        return true;
    }
    include_pats.iter().any(|p| p.matches(file_name))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_dir() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(root.join("b_service.log"), "line\n").expect("write b_service.log");
        fs::write(root.join("a_app.log"), "line\n").expect("write a_app.log");
        fs::write(root.join("c_rotated.log.gz"), "gz").expect("write c_rotated.log.gz");
        fs::write(root.join("readme.txt"), "Just a readme\n").expect("write readme.txt");
        fs::write(root.join("app.log.1"), "old\n").expect("write app.log.1");

        let sub = root.join("nested.log");
        fs::create_dir(&sub).expect("mkdir nested.log");
        fs::write(sub.join("inner.log"), "line\n").expect("write inner.log");

        dir
    }

    fn names(files: &[DiscoveredFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_discovers_log_files_sorted() {
        let dir = make_temp_dir();
        let outcome = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();

        assert_eq!(
            names(&outcome.files),
            vec!["a_app.log", "b_service.log", "c_rotated.log.gz"]
        );
        assert!(outcome.failures.is_empty());
        assert!(
            outcome.warnings.is_empty(),
            "unexpected warnings: {:?}",
            outcome.warnings
        );
    }

    #[test]
    fn test_compressed_flag() {
        let dir = make_temp_dir();
        let outcome = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        let flags: Vec<bool> = outcome.files.iter().map(|f| f.compressed).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn test_custom_include_patterns() {
        let dir = make_temp_dir();
        let config = DiscoveryConfig {
            include_patterns: vec!["*.txt".to_string()],
        };
        let outcome = discover_files(dir.path(), &config).unwrap();
        assert_eq!(names(&outcome.files), vec!["readme.txt"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert!(outcome.files.is_empty());
        assert!(outcome.failures.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_log_symlink_is_a_failure() {
        let dir = make_temp_dir();
        let root = dir.path();
        std::os::unix::fs::symlink(root.join("missing_target"), root.join("0_dangling.log"))
            .expect("symlink 0_dangling.log");
        std::os::unix::fs::symlink(root.join("missing_target"), root.join("0_dangling.txt"))
            .expect("symlink 0_dangling.txt");

        let outcome = discover_files(root, &DiscoveryConfig::default()).unwrap();

        assert_eq!(
            names(&outcome.files),
            vec!["a_app.log", "b_service.log", "c_rotated.log.gz"]
        );
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].path.ends_with("0_dangling.log"));
        assert_eq!(outcome.warnings.len(), 1, "warnings: {:?}", outcome.warnings);
        assert!(outcome.warnings[0].contains("0_dangling.txt"));
    }

    #[test]
    fn test_root_not_found() {
        let result = discover_files(
            Path::new("/nonexistent/path/logtally"),
            &DiscoveryConfig::default(),
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_root_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir.log");
        fs::write(&file, "content").unwrap();
        let result = discover_files(&file, &DiscoveryConfig::default());
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip(Path::new("a.log.gz")));
        assert!(is_gzip(Path::new("a.log.GZ")));
        assert!(!is_gzip(Path::new("a.log")));
        assert!(!is_gzip(Path::new("gz")));
    }
}
