//! Size-limited append-only file with numbered backups.
//!
//! When the file reaches its size limit it is renamed to `<name>.1`, the
//! previous `.1` becomes `.2`, and so on; the oldest backup beyond the limit
//! is deleted. `.1` is therefore always the newest backup.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Rotation threshold for span files (5 MiB).
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Number of numbered backups kept.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe line writer with size-based rotation.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    /// Lazily opened on first write, closed on rotation.
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    /// Writer with the default limits.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Writer rotating at `max_bytes` and keeping `backups` old files.
    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            backups,
            file: Mutex::new(None),
        }
    }

    /// Path of the live file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of backup number `n` (1 is the newest).
    #[must_use]
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Appends `line` plus a newline, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from rotation, opening, or writing, and an error if
    /// the internal lock is poisoned.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("mutex poisoned: {e}")))?;

        let full = fs::metadata(&self.path).is_ok_and(|m| m.len() >= self.max_bytes);
        if full {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            *guard = Some(file);
        }

        let file = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "no file available"))?;
        writeln!(file, "{line}")?;
        file.flush()
    }

    /// Shifts every backup up by one and moves the live file to `.1`.
    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.path);
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_into_numbered_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::with_limits(dir.path().join("spans.jsonl"), 10, 2);

        for line in ["first-line", "second-line", "third-line", "fourth-line"] {
            writer.write_line(line).unwrap();
        }

        let read = |path: PathBuf| fs::read_to_string(path).unwrap();
        assert_eq!(read(writer.path().to_path_buf()), "fourth-line\n");
        assert_eq!(read(writer.backup_path(1)), "third-line\n");
        assert_eq!(read(writer.backup_path(2)), "second-line\n");
        assert!(!writer.backup_path(3).exists());
    }

    #[test]
    fn small_writes_stay_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::new(dir.path().join("spans.jsonl"));
        writer.write_line("a").unwrap();
        writer.write_line("b").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "a\nb\n");
        assert!(!writer.backup_path(1).exists());
    }
}
