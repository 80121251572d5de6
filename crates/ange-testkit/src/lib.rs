//! Test utilities for ange
//!
//! This crate provides shared testing utilities used across the ange workspace.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// This keeps test files next to the workspace instead of the system temp
/// directory, which matters for watch tests on platforms where `/tmp` is a
/// symlink.
///
/// # Panics
///
/// Panics if the current directory is unavailable or `.tmp/` cannot be created.
///
/// # Examples
///
/// ```rust
/// use ange_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("test.ange.txt");
/// std::fs::write(&file_path, "test data").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Write `content` to `dir/rel`, creating parent directories
pub fn write_file(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Poll until `path` exists and its content satisfies `accept`
///
/// Returns the last content read, or `None` on timeout.
pub async fn wait_for_content<F>(path: &Path, timeout: Duration, accept: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(content) = std::fs::read_to_string(path) {
            if accept(&content) {
                return Some(content);
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

/// Poll until `path` exists, returning its content
pub async fn wait_for_file(path: &Path, timeout: Duration) -> Option<String> {
    wait_for_content(path, timeout, |_| true).await
}
