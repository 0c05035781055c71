//! Atomic file operations for import/export.
//!
//! Exports never leave a half-written file behind: content goes to a
//! sibling temp file, is synced to disk, then renamed over the target.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::sync::types::{ProblemDocument, SyncError, SyncResult};

/// Sibling temp path: `<name>.tmp` next to the target.
fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file next to the target
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> SyncResult<()> {
    let temp_path = temp_path(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Serialize documents as JSON lines.
///
/// Non-ASCII text is written verbatim (UTF-8), not escaped.
///
/// # Errors
///
/// Returns an error if a document cannot be serialized.
pub fn render_jsonl(documents: &[ProblemDocument]) -> SyncResult<String> {
    let mut content = String::new();
    for doc in documents {
        content.push_str(&serde_json::to_string(doc)?);
        content.push('\n');
    }
    Ok(content)
}

/// Write documents to a JSONL file atomically.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_jsonl(path: &Path, documents: &[ProblemDocument]) -> SyncResult<()> {
    atomic_write(path, &render_jsonl(documents)?)
}

/// Open a JSONL file for line-by-line reading.
///
/// # Errors
///
/// Returns [`SyncError::FileNotFound`] if the path does not exist.
pub fn open_jsonl(path: &Path) -> SyncResult<BufReader<File>> {
    if !path.exists() {
        return Err(SyncError::FileNotFound(path.display().to_string()));
    }
    Ok(BufReader::new(File::open(path)?))
}

/// Count the non-blank lines in a file.
///
/// Works on raw bytes, so lines that are not valid UTF-8 are still counted.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn count_lines(path: &Path) -> SyncResult<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    let mut count = 0;
    while reader.read_until(b'\n', &mut buf)? > 0 {
        if !buf.trim_ascii().is_empty() {
            count += 1;
        }
        buf.clear();
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("test.jsonl");

        atomic_write(&path, "line 1\nline 2\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "line 1\nline 2\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_render_jsonl_keeps_unicode() {
        let doc = ProblemDocument {
            title: "最短路径".to_string(),
            ..ProblemDocument::default()
        };
        let content = render_jsonl(&[doc.clone(), doc]).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("最短路径"));
    }

    #[test]
    fn test_count_lines_skips_blank() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");

        assert_eq!(count_lines(&path).unwrap(), 0);

        fs::write(&path, "{}\n\n{}\n   \n{}\n").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 3);
    }

    #[test]
    fn test_count_lines_tolerates_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");

        fs::write(&path, b"{\"title\":\"ok\"}\n{\"title\":\"\xff\xfe\"}\n\n{}").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_jsonl(Path::new("/nonexistent/file.jsonl"));
        assert!(matches!(result, Err(SyncError::FileNotFound(_))));
    }
}
